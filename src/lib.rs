// ==========================================
// 服装生产排产系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 产线排产计算核心 (供看板界面消费)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排产规则
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 看板层 - 会话状态与编排
pub mod board;

// 导入层 - 外部订单数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA/建表统一)
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AllocationRecord, EfficiencyPoint, HolidayCalendar, Order, OrderStatus, PlacementChoice,
    ProductionLine, RampUpPlan,
};

// 引擎
pub use engine::{
    AllocationEngine, AllocatorConfig, CapacityCalculator, DropOutcome, EfficiencyResolver,
    EngineError, OrderSplitter, PendingPlacement, Placement, PlacementResolver,
};

// 看板
pub use board::{BoardError, SchedulePersistence, SchedulingBoard, SqlitePersistence};

// 配置
pub use config::ConfigManager;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "服装生产排产系统";

// ==========================================
// 预编译检查
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
