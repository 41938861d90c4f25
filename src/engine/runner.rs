// ==========================================
// 电商数据入库 - 运行入口
// ==========================================
// 职责: 配置 → 加载计划 → 打开 Sink → 编排执行
// ==========================================

use crate::config::IngestConfig;
use crate::engine::events::RunOutcome;
use crate::engine::orchestrator::{run_plan, sink_unavailable};
use crate::engine::plan::{IngestPlan, PlanError};
use crate::importer::ReaderOptions;
use crate::repository::SqliteSink;
use tracing::info;

/// 按配置执行一次完整入库
///
/// 计划构造失败（依赖声明有误）返回 Err；其余致命错误体现在 RunOutcome::Aborted
pub fn run_ingest(config: &IngestConfig) -> Result<RunOutcome, PlanError> {
    let plan = IngestPlan::from_config(config)?;
    info!(
        data_dir = %config.data_dir.display(),
        database = %config.database_path.display(),
        chunk_size = config.chunk_size,
        "入库计划已生成"
    );

    let mut sink = match SqliteSink::from_config(config) {
        Ok(sink) => sink,
        Err(e) => return Ok(sink_unavailable(e)),
    };

    Ok(run_plan(&mut sink, &plan, ReaderOptions::from(config)))
}
