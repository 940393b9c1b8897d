// ==========================================
// 服装生产排产系统 - 拖放落位解析引擎
// ==========================================
// 职责: 解释 "订单拖放到 (产线, 日期)" 事件
// 两段式 API: propose_drop 给出落位方案或待决告知,
//             resolve_choice 在用户二选一后给出最终落位
// 红线: 占用单元格的歧义落位不设默认值, 必须等用户选择;
//       拖到自身或未知产线是 no-op, 不是错误
// ==========================================

use crate::domain::allocation::AllocationRecord;
use crate::domain::line::ProductionLine;
use crate::domain::order::Order;
use crate::domain::types::PlacementChoice;
use crate::engine::allocator::AllocationEngine;
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// Placement - 已决议的落位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub order_id: String,
    pub line_id: String,
    pub start_date: NaiveDate, // 分配引擎的起始日历日
}

// ==========================================
// PendingPlacement - 待用户二选一的落位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPlacement {
    pub order_id: String,
    pub line_id: String,
    pub drop_date: NaiveDate,    // 拖放单元格日期
    pub target_order_id: String, // 占用该单元格的目标订单
}

// ==========================================
// DropOutcome - 拖放解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// 无效拖放 (自身 / 未知产线), 静默忽略
    NoOp,
    /// 空单元格: 直接落位
    Placed(Placement),
    /// 占用单元格: 需要用户在 WHERE_DROPPED / AFTER_ORDER 之间选择
    Ambiguous(PendingPlacement),
}

// ==========================================
// PlacementResolver - 落位解析引擎
// ==========================================
pub struct PlacementResolver {
    // 无状态引擎
}

impl PlacementResolver {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 第一段: 解析拖放事件
    ///
    /// # 参数
    /// - `order_id`: 被拖订单
    /// - `line_id`: 目标产线
    /// - `drop_date`: 目标日期
    /// - `orders` / `lines` / `records`: 当前看板状态
    ///
    /// # 返回
    /// - NoOp: 拖到自身占用的单元格, 或产线不在已知集合内
    /// - Placed: 空单元格, 从 drop_date 直接落位
    /// - Ambiguous: 单元格被其他订单占用, 等待用户选择
    ///
    /// # 错误
    /// - 订单不在当前集合 -> UnknownOrder
    #[instrument(skip(self, orders, lines, records))]
    pub fn propose_drop(
        &self,
        order_id: &str,
        line_id: &str,
        drop_date: NaiveDate,
        orders: &[Order],
        lines: &[ProductionLine],
        records: &[AllocationRecord],
    ) -> EngineResult<DropOutcome> {
        if !orders.iter().any(|o| o.order_id == order_id) {
            return Err(EngineError::UnknownOrder(order_id.to_string()));
        }

        // 未知产线: no-op (看板可能残留已删除产线的拖放事件)
        if !lines.iter().any(|l| l.line_id == line_id) {
            return Ok(DropOutcome::NoOp);
        }

        // 拖到自身占用的单元格: no-op
        let self_occupies = records
            .iter()
            .any(|r| r.order_id == order_id && r.line_id == line_id && r.date == drop_date);
        if self_occupies {
            return Ok(DropOutcome::NoOp);
        }

        // 该单元格的其他占用订单
        match self.dominant_occupant(order_id, line_id, drop_date, records) {
            None => Ok(DropOutcome::Placed(Placement {
                order_id: order_id.to_string(),
                line_id: line_id.to_string(),
                start_date: drop_date,
            })),
            Some(target_order_id) => Ok(DropOutcome::Ambiguous(PendingPlacement {
                order_id: order_id.to_string(),
                line_id: line_id.to_string(),
                drop_date,
                target_order_id,
            })),
        }
    }

    /// 第二段: 用户二选一后给出最终落位
    ///
    /// - WHERE_DROPPED: 从拖放日期起, 与目标订单按余量共享产能
    /// - AFTER_ORDER: 从目标订单末日起 (先吃其末日剩余产能, 自然滚入后续空日)
    pub fn resolve_choice(
        &self,
        pending: &PendingPlacement,
        choice: PlacementChoice,
        records: &[AllocationRecord],
    ) -> Placement {
        let start_date = match choice {
            PlacementChoice::WhereDropped => pending.drop_date,
            PlacementChoice::AfterOrder => AllocationEngine::last_scheduled_date(
                records,
                &pending.target_order_id,
                &pending.line_id,
            )
            .unwrap_or(pending.drop_date),
        };

        Placement {
            order_id: pending.order_id.clone(),
            line_id: pending.line_id.clone(),
            start_date,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 单元格上占主导的其他订单: 多订单共占时取末日最晚者
    fn dominant_occupant(
        &self,
        order_id: &str,
        line_id: &str,
        date: NaiveDate,
        records: &[AllocationRecord],
    ) -> Option<String> {
        let occupants: Vec<&str> = records
            .iter()
            .filter(|r| r.line_id == line_id && r.date == date && r.order_id != order_id)
            .map(|r| r.order_id.as_str())
            .collect();

        occupants
            .into_iter()
            .max_by_key(|oid| AllocationEngine::last_scheduled_date(records, oid, line_id))
            .map(|s| s.to_string())
    }
}

impl Default for PlacementResolver {
    fn default() -> Self {
        Self::new()
    }
}
