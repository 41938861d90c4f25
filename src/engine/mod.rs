// ==========================================
// 电商数据入库 - 编排层
// ==========================================
// 职责: 按外键依赖顺序驱动 读取层 → 写入层
// 约束: 单线程、顺序执行；块级失败隔离
// ==========================================

pub mod events;
pub mod orchestrator;
pub mod plan;
pub mod runner;

// 重导出核心类型
pub use events::{ChunkOutcome, EntitySummary, FatalError, RunOutcome, RunState, RunSummary};
pub use orchestrator::{run_plan, sink_unavailable, IngestOrchestrator};
pub use plan::{IngestPlan, LoadStep, PlanError};
pub use runner::run_ingest;
