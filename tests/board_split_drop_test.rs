// ==========================================
// 订单拆分与拖放落位集成测试
// ==========================================
// 目标: 验证拆分守恒/编号续排, 以及两段式拖放在
//       空单元格与占用单元格上的完整路径
// ==========================================


#[cfg(test)]
mod board_split_drop_test {
    use crate::test_helpers::{create_test_db, date, flat_plan, make_line, make_order, shared_connection};
    use garment_aps::board::{SchedulingBoard, SqlitePersistence};
    use garment_aps::domain::types::{OrderStatus, PlacementChoice};
    use garment_aps::engine::{AllocatorConfig, DropOutcome};
    use garment_aps::repository::AllocationRepository;

    fn make_board(db_path: &str) -> SchedulingBoard<SqlitePersistence> {
        let conn = shared_connection(db_path).unwrap();
        SchedulingBoard::new(
            SqlitePersistence::from_connection(conn),
            flat_plan(),
            AllocatorConfig::default(),
        )
    }

    // ==========================================
    // 拆分
    // ==========================================

    #[tokio::test]
    async fn test_split_conserves_quantities() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        let mut order = make_order("PO-500", 500, 12.0);
        order.cut_quantity = 200;
        order.issue_quantity = 100;
        let order = board.add_order(order).await.unwrap();

        let (a, b) = board.split_order(&order.order_id, 300).await.unwrap();

        // 件数守恒
        assert_eq!(a.order_quantity, 300);
        assert_eq!(b.order_quantity, 200);
        assert_eq!(a.cut_quantity + b.cut_quantity, 200);
        assert_eq!(a.issue_quantity + b.issue_quantity, 100);

        // A 保留原PO, B 带拆分后缀
        assert_eq!(a.order_id, order.order_id);
        assert_eq!(a.po_number, "PO-500");
        assert_eq!(b.po_number, "PO-500 Split 1");
        assert_eq!(b.base_po_number, "PO-500");
        assert_eq!(b.status, OrderStatus::Pending);

        // 重新载入后两个分片都在
        let mut reloaded = make_board(&db_path);
        reloaded.load().await.unwrap();
        assert_eq!(reloaded.orders().len(), 2);
    }

    #[tokio::test]
    async fn test_split_numbering_continues_per_base_po() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        let order = board.add_order(make_order("PO-N", 600, 10.0)).await.unwrap();
        let (a, b1) = board.split_order(&order.order_id, 400).await.unwrap();
        let (_, b2) = board.split_order(&a.order_id, 200).await.unwrap();

        assert_eq!(b1.po_number, "PO-N Split 1");
        assert_eq!(b2.po_number, "PO-N Split 2");
    }

    #[tokio::test]
    async fn test_split_scheduled_order_voids_allocations() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let order = board.add_order(make_order("PO-S", 300, 10.0)).await.unwrap();
        board
            .schedule_order(&order.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        let (a, b) = board.split_order(&order.order_id, 100).await.unwrap();

        // 原分配作废, 两个分片均回待排池
        assert_eq!(a.status, OrderStatus::Pending);
        assert_eq!(b.status, OrderStatus::Pending);
        assert!(a.actual_production.is_empty());

        let conn = shared_connection(&db_path).unwrap();
        let repo = AllocationRepository::from_connection(conn);
        assert!(repo.find_by_order(&order.order_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schedule_fragment_leaves_sibling_untouched() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let order = board.add_order(make_order("PO-F", 300, 10.0)).await.unwrap();

        // 300 拆成 120 / 180, 只排 180 分片
        let (a, b) = board.split_order(&order.order_id, 120).await.unwrap();
        assert_eq!(a.order_quantity, 120);
        assert_eq!(b.order_quantity, 180);

        board
            .schedule_order(&b.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        let scheduled = board.find_order(&b.order_id).unwrap();
        assert_eq!(scheduled.actual_production[&date(2025, 6, 2)], 100);
        assert_eq!(scheduled.actual_production[&date(2025, 6, 3)], 80);

        // 120 分片原样留在待排池, 无分配记录
        let sibling = board.find_order(&a.order_id).unwrap();
        assert_eq!(sibling.status, OrderStatus::Pending);
        assert_eq!(sibling.order_quantity, 120);
        assert!(sibling.actual_production.is_empty());

        let conn = shared_connection(&db_path).unwrap();
        let repo = AllocationRepository::from_connection(conn);
        assert!(repo.find_by_order(&a.order_id).unwrap().is_empty());
    }

    // ==========================================
    // 拖放
    // ==========================================

    #[tokio::test]
    async fn test_drop_on_empty_cell_places_immediately() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let order = board.add_order(make_order("PO-D", 150, 10.0)).await.unwrap();

        let outcome = board
            .handle_drop(&order.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        match outcome {
            DropOutcome::Placed(placement) => {
                assert_eq!(placement.start_date, date(2025, 6, 2));
            }
            other => panic!("应直接落位, 实际: {:?}", other),
        }
        let placed = board.find_order(&order.order_id).unwrap();
        assert_eq!(placed.status, OrderStatus::Scheduled);
        assert_eq!(placed.plan_start_date, Some(date(2025, 6, 2)));
    }

    #[tokio::test]
    async fn test_drop_on_occupied_cell_requires_choice() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let occupant = board.add_order(make_order("PO-O", 150, 10.0)).await.unwrap();
        let incoming = board.add_order(make_order("PO-I", 120, 10.0)).await.unwrap();
        board
            .schedule_order(&occupant.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        let outcome = board
            .handle_drop(&incoming.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        let pending = match outcome {
            DropOutcome::Ambiguous(p) => p,
            other => panic!("应请求二选一, 实际: {:?}", other),
        };
        assert_eq!(pending.target_order_id, occupant.order_id);

        // AFTER_ORDER: 从目标订单末日 (6/3, 余量50) 起连续排
        board
            .resolve_drop(&pending, PlacementChoice::AfterOrder)
            .await
            .unwrap();
        let placed = board.find_order(&incoming.order_id).unwrap();
        assert_eq!(placed.actual_production[&date(2025, 6, 3)], 50);
        assert_eq!(placed.actual_production[&date(2025, 6, 4)], 70);
    }

    #[tokio::test]
    async fn test_resolve_where_dropped_shares_from_drop_date() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let occupant = board.add_order(make_order("PO-O", 150, 10.0)).await.unwrap();
        let incoming = board.add_order(make_order("PO-I", 120, 10.0)).await.unwrap();
        board
            .schedule_order(&occupant.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        let outcome = board
            .handle_drop(&incoming.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();
        let pending = match outcome {
            DropOutcome::Ambiguous(p) => p,
            other => panic!("应请求二选一, 实际: {:?}", other),
        };

        // WHERE_DROPPED: 6/2 已满只占日历日, 6/3 吃余量50, 6/4 排70
        board
            .resolve_drop(&pending, PlacementChoice::WhereDropped)
            .await
            .unwrap();
        let placed = board.find_order(&incoming.order_id).unwrap();
        assert!(placed.actual_production.get(&date(2025, 6, 2)).is_none());
        assert_eq!(placed.actual_production[&date(2025, 6, 3)], 50);
        assert_eq!(placed.actual_production[&date(2025, 6, 4)], 70);
    }

    #[tokio::test]
    async fn test_drop_noop_cases() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let order = board.add_order(make_order("PO-Z", 100, 10.0)).await.unwrap();
        board
            .schedule_order(&order.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        // 拖到自身占用的单元格
        let outcome = board
            .handle_drop(&order.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();
        assert_eq!(outcome, DropOutcome::NoOp);

        // 拖到未知产线
        let outcome = board
            .handle_drop(&order.order_id, "L9", date(2025, 6, 2))
            .await
            .unwrap();
        assert_eq!(outcome, DropOutcome::NoOp);
    }
}
