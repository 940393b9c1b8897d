// ==========================================
// 服装生产排产系统 - 领域类型定义
// ==========================================
// 职责: 订单状态、落位选择等基础枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 生命周期: PENDING (待排) -> SCHEDULED (已排产) -> 可回退 PENDING
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,   // 待排池
    Scheduled, // 已分配产线
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Scheduled => write!(f, "SCHEDULED"),
        }
    }
}

impl OrderStatus {
    /// 从数据库字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "SCHEDULED" => Some(OrderStatus::Scheduled),
            _ => None,
        }
    }
}

// ==========================================
// 落位选择 (Placement Choice)
// ==========================================
// 拖放到已占用单元格时, 需要用户在两种落位方式之间二选一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementChoice {
    WhereDropped, // 从拖放日期开始, 与既有订单共享产能
    AfterOrder,   // 接在目标订单末日之后, 利用其末日剩余产能
}

impl fmt::Display for PlacementChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementChoice::WhereDropped => write!(f, "WHERE_DROPPED"),
            PlacementChoice::AfterOrder => write!(f, "AFTER_ORDER"),
        }
    }
}
