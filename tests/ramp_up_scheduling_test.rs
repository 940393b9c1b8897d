// ==========================================
// 爬坡曲线排产集成测试
// ==========================================
// 目标: 验证效率曲线 -> 日产能 -> 分配序列在看板全链路中的贯通
// ==========================================


#[cfg(test)]
mod ramp_up_scheduling_test {
    use crate::test_helpers::{create_test_db, date, make_line, make_order, ramp_plan, shared_connection};
    use garment_aps::board::{SchedulingBoard, SqlitePersistence};
    use garment_aps::engine::AllocatorConfig;
    use garment_aps::repository::HolidayRepository;

    fn make_board(db_path: &str) -> SchedulingBoard<SqlitePersistence> {
        let conn = shared_connection(db_path).unwrap();
        SchedulingBoard::new(
            SqlitePersistence::from_connection(conn),
            ramp_plan(),
            AllocatorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_ramp_up_curve_shapes_daily_output() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        // 500件/天 @100% 基准, 曲线 50/70/85 收尾 90
        board.add_line(make_line("L1", 500, 1)).await.unwrap();
        let order = board.add_order(make_order("PO-R", 1000, 15.0)).await.unwrap();

        board
            .schedule_order(&order.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        let scheduled = board.find_order(&order.order_id).unwrap();
        assert_eq!(scheduled.actual_production[&date(2025, 6, 2)], 250); // 50%
        assert_eq!(scheduled.actual_production[&date(2025, 6, 3)], 350); // 70%
        assert_eq!(scheduled.actual_production[&date(2025, 6, 4)], 400); // 剩余 < 85%产出
        assert_eq!(scheduled.allocated_quantity(), 1000);
    }

    #[tokio::test]
    async fn test_final_efficiency_beyond_curve() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let mut board = make_board(&db_path);
        board.load().await.unwrap();

        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let order = board.add_order(make_order("PO-F", 400, 15.0)).await.unwrap();

        board
            .schedule_order(&order.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        // 50 + 70 + 85 = 205, 曲线外按收尾效率 90% 走
        let scheduled = board.find_order(&order.order_id).unwrap();
        assert_eq!(scheduled.actual_production[&date(2025, 6, 5)], 90);
        assert_eq!(scheduled.actual_production[&date(2025, 6, 6)], 90);
        assert_eq!(scheduled.actual_production[&date(2025, 6, 7)], 15);
        assert_eq!(scheduled.plan_end_date, Some(date(2025, 6, 7)));
    }

    #[tokio::test]
    async fn test_holiday_does_not_advance_ramp_day() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = shared_connection(&db_path).unwrap();
        HolidayRepository::from_connection(conn)
            .add(date(2025, 6, 3))
            .unwrap();

        let mut board = make_board(&db_path);
        board.load().await.unwrap();
        board.add_line(make_line("L1", 100, 1)).await.unwrap();
        let order = board.add_order(make_order("PO-H", 120, 15.0)).await.unwrap();

        board
            .schedule_order(&order.order_id, "L1", date(2025, 6, 2))
            .await
            .unwrap();

        // 假日只吃日历日, 不吃曲线天: 6/4 仍按第2天 70% 产出
        let scheduled = board.find_order(&order.order_id).unwrap();
        assert_eq!(scheduled.actual_production[&date(2025, 6, 2)], 50);
        assert!(scheduled.actual_production.get(&date(2025, 6, 3)).is_none());
        assert_eq!(scheduled.actual_production[&date(2025, 6, 4)], 70);
    }
}
