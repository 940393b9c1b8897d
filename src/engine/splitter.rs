// ==========================================
// 服装生产排产系统 - 订单拆分引擎
// ==========================================
// 职责: 按件数把一张订单拆成两张可独立排产的订单
// 红线: 拆分前后件数守恒; 已排产订单拆分后两个分片一律回到待排池
//       (拆分件的产能占用不可分割, 必须重跑分配引擎)
// ==========================================

use crate::domain::order::Order;
use crate::domain::types::OrderStatus;
use crate::engine::error::{EngineError, EngineResult};
use chrono::Utc;
use tracing::instrument;

// ==========================================
// OrderSplitter - 订单拆分引擎
// ==========================================
pub struct OrderSplitter {
    // 无状态引擎
}

impl OrderSplitter {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 拆分订单
    ///
    /// 规则:
    /// 1) A 保留原 order_id 与 po_number, 件数 = split_quantity
    /// 2) B 取新 uuid, po_number = "<base> Split <N>", 件数 = 余量
    /// 3) 两个分片继承 smv / 款号 / base_po_number
    /// 4) cut/issue 件数按比例拆分, 取整余差归 A
    /// 5) 原单若已排产, 两个分片均回到 PENDING (分配作废)
    ///
    /// # 参数
    /// - `order`: 原订单
    /// - `split_quantity`: A 保留件数, 必须在 (0, order_quantity) 开区间
    /// - `split_no`: B 的拆分序号 (同一 base_po_number 下由调用方保证唯一递增)
    ///
    /// # 返回
    /// (orderA, orderB)
    ///
    /// # 错误
    /// - split_quantity 越界 -> InvalidSplitQuantity
    #[instrument(skip(self, order), fields(
        order_id = %order.order_id,
        po_number = %order.po_number,
        order_quantity = order.order_quantity,
    ))]
    pub fn split(
        &self,
        order: &Order,
        split_quantity: i64,
        split_no: u32,
    ) -> EngineResult<(Order, Order)> {
        if split_quantity <= 0 || split_quantity >= order.order_quantity {
            return Err(EngineError::InvalidSplitQuantity {
                split_quantity,
                order_quantity: order.order_quantity,
            });
        }

        let remainder = order.order_quantity - split_quantity;
        let ratio_b = remainder as f64 / order.order_quantity as f64;

        // B 按比例取整, 余差归 A, 保证合计守恒
        let cut_b = (order.cut_quantity as f64 * ratio_b).round() as i64;
        let issue_b = (order.issue_quantity as f64 * ratio_b).round() as i64;

        let now = Utc::now();

        let mut order_a = order.clone();
        order_a.order_quantity = split_quantity;
        order_a.cut_quantity = order.cut_quantity - cut_b;
        order_a.issue_quantity = order.issue_quantity - issue_b;
        order_a.updated_at = now;

        let mut order_b = order.clone();
        order_b.order_id = uuid::Uuid::new_v4().to_string();
        order_b.po_number = format!("{} Split {}", order.base_po_number, split_no);
        order_b.order_quantity = remainder;
        order_b.cut_quantity = cut_b;
        order_b.issue_quantity = issue_b;
        order_b.created_at = now;
        order_b.updated_at = now;

        // 已排产订单的分配无法按件分割, 两个分片一律作废回待排
        if order.status == OrderStatus::Scheduled {
            order_a.clear_allocation();
            order_b.clear_allocation();
        } else {
            order_b.clear_allocation();
        }

        Ok((order_a, order_b))
    }

    /// 把订单移回待排池
    ///
    /// 清除产线分配 / 计划起止日期 / 按日产量;
    /// 持久化的 allocation_record 删除由 Board 负责
    pub fn move_to_pending(&self, order: &mut Order) {
        order.clear_allocation();
    }
}

impl Default for OrderSplitter {
    fn default() -> Self {
        Self::new()
    }
}
