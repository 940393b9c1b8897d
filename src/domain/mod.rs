// ==========================================
// 服装生产排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod allocation;
pub mod calendar;
pub mod line;
pub mod order;
pub mod rampup;
pub mod types;

// 重导出核心类型
pub use allocation::{consumed_on, daily_view, AllocationRecord};
pub use calendar::HolidayCalendar;
pub use line::ProductionLine;
pub use order::Order;
pub use rampup::{EfficiencyPoint, RampUpPlan};
pub use types::{OrderStatus, PlacementChoice};
