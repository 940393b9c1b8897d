// ==========================================
// 服装生产排产系统 - 数据仓储层
// ==========================================
// 职责: order_master / production_line / allocation_record / holiday
//       四张表的数据访问
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod allocation_repo;
pub mod error;
pub mod holiday_repo;
pub mod line_repo;
pub mod order_repo;

// 重导出核心类型
pub use allocation_repo::AllocationRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use holiday_repo::HolidayRepository;
pub use line_repo::ProductionLineRepository;
pub use order_repo::OrderRepository;
