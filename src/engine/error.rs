// ==========================================
// 服装生产排产系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 引擎错误同步返回, 引擎内部不做重试
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入数据错误 =====
    #[error("订单数据无效: {0}")]
    InvalidOrderData(String),

    #[error("拆分数量无效: split_quantity={split_quantity}, order_quantity={order_quantity}")]
    InvalidSplitQuantity {
        split_quantity: i64,
        order_quantity: i64,
    },

    // ===== 排产计算错误 =====
    #[error("排产超出时间视野: line_id={line_id}, horizon_days={horizon_days}, 剩余件数={remaining}")]
    SchedulingHorizonExceeded {
        line_id: String,
        horizon_days: u32,
        remaining: i64,
    },

    // ===== 引用错误 =====
    #[error("产线不存在: {0}")]
    UnknownLine(String),

    #[error("订单不存在: {0}")]
    UnknownOrder(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
