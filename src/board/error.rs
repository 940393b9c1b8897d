// ==========================================
// 服装生产排产系统 - 看板层错误类型
// ==========================================
// 职责: 汇聚引擎/仓储错误, 补充看板编排特有的冲突错误
// 红线: 错误原样上抛给界面层, 不做静默吞错, 不做内部重试
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 看板层错误类型
#[derive(Error, Debug)]
pub enum BoardError {
    // ===== 并发冲突 =====
    /// 提交前复读发现订单状态已被其他会话改变
    #[error("排产冲突: order_id={order_id}, 库中状态={stored_status}, 期望状态={expected_status}")]
    ScheduleConflict {
        order_id: String,
        stored_status: String,
        expected_status: String,
    },

    // ===== 下层错误透传 =====
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type BoardResult<T> = Result<T, BoardError>;
