// ==========================================
// 服装生产排产系统 - 引擎层
// ==========================================
// 职责: 实现排产核心规则, 不拼 SQL, 无持久化副作用
// 红线: 引擎是纯函数式的 - 输入看板状态, 输出分配序列或错误
// ==========================================

pub mod allocator;
pub mod capacity;
pub mod efficiency;
pub mod error;
pub mod placement;
pub mod splitter;

// 重导出核心引擎
pub use allocator::{AllocationEngine, AllocatorConfig, DEFAULT_MAX_HORIZON_DAYS};
pub use capacity::CapacityCalculator;
pub use efficiency::EfficiencyResolver;
pub use error::{EngineError, EngineResult};
pub use placement::{DropOutcome, PendingPlacement, Placement, PlacementResolver};
pub use splitter::OrderSplitter;
