// ==========================================
// 服装生产排产系统 - 排产看板状态
// ==========================================
// 职责: 会话内订单/产线/分配记录的权威内存状态,
//       编排分配引擎、拆分引擎、落位解析引擎,
//       每次变更后由分配记录重算派生字段并落库
// 红线: 提交排产前复读订单状态, 状态被其他会话改变则中止;
//       要么整组分配落库, 要么一条不落
// ==========================================

pub mod error;
pub mod persistence;

pub use error::{BoardError, BoardResult};
pub use persistence::{SchedulePersistence, SqlitePersistence};

use crate::config::ConfigManager;
use crate::domain::allocation::{daily_view, AllocationRecord};
use crate::domain::calendar::HolidayCalendar;
use crate::domain::line::ProductionLine;
use crate::domain::order::Order;
use crate::domain::rampup::RampUpPlan;
use crate::domain::types::{OrderStatus, PlacementChoice};
use crate::engine::placement::{DropOutcome, PendingPlacement, Placement};
use crate::engine::{
    AllocationEngine, AllocatorConfig, EngineError, OrderSplitter, PlacementResolver,
};
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

// ==========================================
// SchedulingBoard - 排产看板
// ==========================================
pub struct SchedulingBoard<P: SchedulePersistence> {
    persistence: P,

    // ===== 会话内权威状态 =====
    orders: Vec<Order>,
    lines: Vec<ProductionLine>,
    holidays: HolidayCalendar,
    allocations: Vec<AllocationRecord>,
    selection: Vec<String>,

    // ===== 引擎 =====
    allocator: AllocationEngine,
    splitter: OrderSplitter,
    resolver: PlacementResolver,

    // ===== 配置 =====
    default_plan: RampUpPlan,
}

impl<P: SchedulePersistence> SchedulingBoard<P> {
    /// 创建看板
    ///
    /// # 参数
    /// - `persistence`: 持久化协作方
    /// - `default_plan`: 缺省爬坡计划 (订单未指定曲线时使用)
    /// - `config`: 分配引擎配置
    pub fn new(persistence: P, default_plan: RampUpPlan, config: AllocatorConfig) -> Self {
        Self {
            persistence,
            orders: Vec::new(),
            lines: Vec::new(),
            holidays: HolidayCalendar::new(),
            allocations: Vec::new(),
            selection: Vec::new(),
            allocator: AllocationEngine::with_config(config),
            splitter: OrderSplitter::new(),
            resolver: PlacementResolver::new(),
            default_plan,
        }
    }

    /// 按 config_kv 中的排产配置创建看板
    ///
    /// 时间视野与缺省爬坡计划从配置读取, 未配置时取各自缺省值
    pub fn from_config(persistence: P, config: &ConfigManager) -> BoardResult<Self> {
        let default_plan = config.get_default_ramp_up_plan()?;
        let allocator_config = AllocatorConfig {
            max_horizon_days: config.get_max_horizon_days()?,
        };
        Ok(Self::new(persistence, default_plan, allocator_config))
    }

    // ==========================================
    // 载入与访问
    // ==========================================

    /// 从持久化协作方载入会话状态, 并由分配记录重建订单派生字段
    pub async fn load(&mut self) -> BoardResult<()> {
        self.orders = self.persistence.load_orders().await?;
        self.lines = self.persistence.load_lines().await?;
        self.allocations = self.persistence.load_allocations().await?;
        self.holidays = self.persistence.load_holidays().await?;
        self.selection.clear();

        // actual_production / 计划起止日期一律由分配记录重算, 不信任存量字段
        for order in &mut self.orders {
            let own: Vec<AllocationRecord> = self
                .allocations
                .iter()
                .filter(|r| r.order_id == order.order_id)
                .cloned()
                .collect();
            if let Some(line_id) = own.first().map(|r| r.line_id.clone()) {
                order.apply_allocation(&line_id, daily_view(&own));
            } else if order.status == OrderStatus::Scheduled {
                // 库中标记已排产但无分配记录: 视为脏数据, 回退待排
                order.clear_allocation();
            }
        }

        info!(
            orders = self.orders.len(),
            lines = self.lines.len(),
            allocations = self.allocations.len(),
            holidays = self.holidays.len(),
            "看板载入完成"
        );
        Ok(())
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn lines(&self) -> &[ProductionLine] {
        &self.lines
    }

    pub fn allocations(&self) -> &[AllocationRecord] {
        &self.allocations
    }

    pub fn pending_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .collect()
    }

    pub fn find_order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    pub fn find_line(&self, line_id: &str) -> Option<&ProductionLine> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    // ==========================================
    // 选择
    // ==========================================

    /// 点选订单; multi=true (修饰键) 时切换选中, 否则替换选区
    pub fn select_order(&mut self, order_id: &str, multi: bool) {
        if !multi {
            self.selection.clear();
            self.selection.push(order_id.to_string());
            return;
        }
        if let Some(pos) = self.selection.iter().position(|id| id == order_id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(order_id.to_string());
        }
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ==========================================
    // 基础维护
    // ==========================================

    /// 新增订单 (进入待排池)
    pub async fn add_order(&mut self, order: Order) -> BoardResult<Order> {
        let saved = self.persistence.save_order(&order).await?;
        self.orders.push(saved.clone());
        Ok(saved)
    }

    /// 新增产线
    pub async fn add_line(&mut self, line: ProductionLine) -> BoardResult<ProductionLine> {
        let saved = self.persistence.save_line(&line).await?;
        self.lines.push(saved.clone());
        self.lines.sort_by_key(|l| l.seq_no);
        Ok(saved)
    }

    // ==========================================
    // 排产
    // ==========================================

    /// 把订单从 start_date 起排到指定产线
    ///
    /// 流程: 复读冲突检查 -> 分配引擎计算 -> 整组落库 -> 更新内存
    ///
    /// # 错误
    /// - 订单/产线不在当前集合 -> UnknownOrder / UnknownLine
    /// - 库中状态与会话期望不一致 -> ScheduleConflict
    #[instrument(skip(self))]
    pub async fn schedule_order(
        &mut self,
        order_id: &str,
        line_id: &str,
        start_date: NaiveDate,
    ) -> BoardResult<()> {
        let order = self
            .find_order(order_id)
            .ok_or_else(|| EngineError::UnknownOrder(order_id.to_string()))?
            .clone();
        let line = self
            .find_line(line_id)
            .ok_or_else(|| EngineError::UnknownLine(line_id.to_string()))?
            .clone();

        // 提交前复读: 其他会话可能已抢先排产 (last-write-wins 的前置检查)
        if let Some(stored) = self.persistence.fetch_order_status(order_id).await? {
            if stored != order.status {
                return Err(BoardError::ScheduleConflict {
                    order_id: order_id.to_string(),
                    stored_status: stored.to_string(),
                    expected_status: order.status.to_string(),
                });
            }
        }

        let records = self.allocator.allocate(
            &line,
            &order,
            &self.default_plan,
            start_date,
            &self.allocations,
            &self.holidays,
        )?;

        // 先落库再改内存: 落库失败时会话状态保持不变
        self.persistence
            .replace_allocations(order_id, &records)
            .await?;

        let daily = daily_view(&records);
        let order_mut = self
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| EngineError::UnknownOrder(order_id.to_string()))?;
        order_mut.apply_allocation(line_id, daily);
        let updated = order_mut.clone();
        self.persistence.save_order(&updated).await?;

        self.allocations.retain(|r| r.order_id != order_id);
        self.allocations.extend(records);

        debug!(order_id, line_id, "排产完成");
        Ok(())
    }

    /// 把订单移回待排池, 清除其分配记录
    #[instrument(skip(self))]
    pub async fn move_to_pending(&mut self, order_id: &str) -> BoardResult<()> {
        let order_mut = self
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| EngineError::UnknownOrder(order_id.to_string()))?;

        self.splitter.move_to_pending(order_mut);
        let updated = order_mut.clone();

        self.persistence.replace_allocations(order_id, &[]).await?;
        self.persistence.save_order(&updated).await?;
        self.allocations.retain(|r| r.order_id != order_id);
        Ok(())
    }

    // ==========================================
    // 拆分
    // ==========================================

    /// 拆分订单; A 保留原ID, B 追加 "Split N" 后缀并进入待排池
    ///
    /// 原单若已排产, 其分配作废, 两个分片均回待排
    #[instrument(skip(self))]
    pub async fn split_order(
        &mut self,
        order_id: &str,
        split_quantity: i64,
    ) -> BoardResult<(Order, Order)> {
        let order = self
            .find_order(order_id)
            .ok_or_else(|| EngineError::UnknownOrder(order_id.to_string()))?
            .clone();

        let split_no = self.next_split_no(&order.base_po_number);
        let (order_a, order_b) = self.splitter.split(&order, split_quantity, split_no)?;

        // 原单已排产时分配作废
        if order.status == OrderStatus::Scheduled {
            self.persistence.replace_allocations(order_id, &[]).await?;
            self.allocations.retain(|r| r.order_id != order_id);
        }

        self.persistence.save_order(&order_a).await?;
        self.persistence.save_order(&order_b).await?;

        if let Some(slot) = self.orders.iter_mut().find(|o| o.order_id == order_id) {
            *slot = order_a.clone();
        }
        self.orders.push(order_b.clone());

        info!(
            order_id,
            fragment_b = %order_b.order_id,
            po_b = %order_b.po_number,
            "订单拆分完成"
        );
        Ok((order_a, order_b))
    }

    /// 同一 base_po_number 下一个未用的拆分序号
    fn next_split_no(&self, base_po_number: &str) -> u32 {
        let max_used = self
            .orders
            .iter()
            .filter(|o| o.base_po_number == base_po_number)
            .filter_map(|o| {
                o.po_number
                    .rsplit_once(" Split ")
                    .and_then(|(_, n)| n.parse::<u32>().ok())
            })
            .max()
            .unwrap_or(0);
        max_used + 1
    }

    // ==========================================
    // 拖放
    // ==========================================

    /// 处理拖放事件
    ///
    /// - 空单元格: 直接排产并返回 Placed
    /// - 占用单元格: 返回 Ambiguous, 等待界面层调用 resolve_drop
    /// - 自身/未知产线: NoOp
    pub async fn handle_drop(
        &mut self,
        order_id: &str,
        line_id: &str,
        drop_date: NaiveDate,
    ) -> BoardResult<DropOutcome> {
        let outcome = self.resolver.propose_drop(
            order_id,
            line_id,
            drop_date,
            &self.orders,
            &self.lines,
            &self.allocations,
        )?;

        if let DropOutcome::Placed(placement) = &outcome {
            let placement = placement.clone();
            self.apply_placement(&placement).await?;
        }
        Ok(outcome)
    }

    /// 用户在 WHERE_DROPPED / AFTER_ORDER 之间做出选择后完成落位
    pub async fn resolve_drop(
        &mut self,
        pending: &PendingPlacement,
        choice: PlacementChoice,
    ) -> BoardResult<Placement> {
        let placement = self
            .resolver
            .resolve_choice(pending, choice, &self.allocations);
        self.apply_placement(&placement).await?;
        Ok(placement)
    }

    async fn apply_placement(&mut self, placement: &Placement) -> BoardResult<()> {
        self.schedule_order(
            &placement.order_id,
            &placement.line_id,
            placement.start_date,
        )
        .await
    }
}
