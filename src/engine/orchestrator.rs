// ==========================================
// 电商数据入库 - 加载编排器
// ==========================================
// 流程: 建表 → 按依赖顺序逐实体 → 逐块事务写入
// 隔离: 块级失败只回滚当前块，记录后继续；
//       建表失败 / 源文件不可用 / 运行中连接丢失为致命错误，立即中止
// 资源: Sink 在所有退出路径上恰好关闭一次
// ==========================================

use crate::domain::EntitySchema;
use crate::engine::events::{
    ChunkOutcome, EntitySummary, FatalError, RunOutcome, RunState, RunSummary,
};
use crate::engine::plan::{IngestPlan, LoadStep};
use crate::importer::{Chunk, ChunkReader, ImportError, ReaderOptions};
use crate::perf::PerfGuard;
use crate::repository::{Sink, SinkError, SinkResult};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// ==========================================
// IngestOrchestrator
// ==========================================
pub struct IngestOrchestrator<'a, S: Sink + ?Sized> {
    sink: &'a mut S,
    options: ReaderOptions,
    state: RunState,
    run_id: String,
}

impl<'a, S: Sink + ?Sized> IngestOrchestrator<'a, S> {
    pub fn new(sink: &'a mut S, options: ReaderOptions) -> Self {
        Self {
            sink,
            options,
            state: RunState::Idle,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// 执行整个计划，结束时关闭 Sink
    pub fn run(&mut self, plan: &IngestPlan) -> RunOutcome {
        info!(run_id = %self.run_id, entities = plan.len(), "--- 开始数据入库 ---");

        let outcome = self.execute(plan);

        if let Err(e) = self.sink.close() {
            warn!(run_id = %self.run_id, error = %e, "关闭 Sink 失败");
        }

        match &outcome {
            RunOutcome::Completed(summary) => {
                let failed = summary.failed_chunks().count();
                info!(
                    run_id = %self.run_id,
                    rows = summary.rows_loaded(),
                    failed_chunks = failed,
                    "--- 数据入库完成 ---"
                );
            }
            RunOutcome::Aborted { error, .. } => {
                error!(run_id = %self.run_id, error = %error, "数据入库中止");
            }
        }
        outcome
    }

    fn execute(&mut self, plan: &IngestPlan) -> RunOutcome {
        let mut summary = RunSummary {
            run_id: self.run_id.clone(),
            ..RunSummary::default()
        };

        // === 步骤 1: 建表 ===
        info!("创建数据表（如不存在）");
        if let Err(e) = self.sink.ensure_schema(&plan.entities()) {
            self.transition(RunState::Aborted);
            return RunOutcome::Aborted {
                error: FatalError::SchemaCreation(e),
                summary,
            };
        }
        self.transition(RunState::SchemaReady);

        // === 步骤 2: 按依赖顺序加载 ===
        for (idx, step) in plan.steps().iter().enumerate() {
            self.transition(RunState::Loading { entity: idx });

            match self.load_entity(step, &mut summary) {
                Ok(entity_summary) => summary.entities.push(entity_summary),
                Err(error) => {
                    self.transition(RunState::Aborted);
                    return RunOutcome::Aborted { error, summary };
                }
            }
        }

        self.transition(RunState::Done);
        RunOutcome::Completed(summary)
    }

    /// 加载单个实体：打开读取器并逐块提交
    ///
    /// 只有源文件层面的错误会返回 Err；块写入失败记入 summary
    fn load_entity(
        &mut self,
        step: &LoadStep,
        summary: &mut RunSummary,
    ) -> Result<EntitySummary, FatalError> {
        let entity = step.entity;
        let _perf = PerfGuard::new("load_entity", entity.table);
        info!(
            run_id = %self.run_id,
            entity = entity.name,
            source = %step.path.display(),
            "开始加载实体"
        );

        let source_unavailable = |source: ImportError| FatalError::SourceUnavailable {
            entity: entity.name.to_string(),
            source,
        };

        let reader =
            ChunkReader::open(&step.path, entity, &self.options).map_err(source_unavailable)?;

        let mut entity_summary = EntitySummary {
            entity: entity.name,
            ..EntitySummary::default()
        };

        for item in reader {
            let chunk = item.map_err(source_unavailable)?;
            let outcome = self.load_chunk(entity, chunk);

            // 连接丢失: 后续块必然失败，整次运行中止
            if let Err(e) = &outcome.result {
                if e.is_fatal() {
                    let fatal = FatalError::SinkUnavailable(e.clone());
                    entity_summary.chunks_failed += 1;
                    entity_summary.rows_failed += outcome.rows;
                    summary.chunks.push(outcome);
                    summary.entities.push(entity_summary);
                    return Err(fatal);
                }
            }

            entity_summary.rows_skipped += outcome.skipped_rows;
            match &outcome.result {
                Ok(rows) => {
                    entity_summary.chunks_loaded += 1;
                    entity_summary.rows_loaded += rows;
                }
                Err(_) => {
                    entity_summary.chunks_failed += 1;
                    entity_summary.rows_failed += outcome.rows;
                }
            }
            summary.chunks.push(outcome);
        }

        info!(
            run_id = %self.run_id,
            entity = entity.name,
            chunks_loaded = entity_summary.chunks_loaded,
            chunks_failed = entity_summary.chunks_failed,
            rows = entity_summary.rows_loaded,
            "实体加载结束"
        );
        Ok(entity_summary)
    }

    /// 提交一个数据块并记录结果
    fn load_chunk(&mut self, entity: &'static EntitySchema, chunk: Chunk) -> ChunkOutcome {
        let result = self.submit_chunk(entity, &chunk);

        match &result {
            Ok(rows) => info!(
                run_id = %self.run_id,
                entity = entity.name,
                chunk = chunk.number,
                rows,
                "数据块加载成功"
            ),
            // 致命错误由 run() 统一记录一次
            Err(e) if e.is_fatal() => debug!(
                run_id = %self.run_id,
                entity = entity.name,
                chunk = chunk.number,
                error = %e,
                "数据块提交时 Sink 不可用"
            ),
            Err(e) => error!(
                run_id = %self.run_id,
                entity = entity.name,
                chunk = chunk.number,
                rows = chunk.len(),
                error = %e,
                "数据块加载失败，该块已回滚"
            ),
        }

        ChunkOutcome {
            entity: entity.name,
            chunk: chunk.number,
            rows: chunk.len(),
            skipped_rows: chunk.stats.skipped_rows,
            result,
        }
    }

    /// 在作用域事务中写入一个数据块
    ///
    /// 失败时显式回滚；提交失败时事务随 drop 回滚
    fn submit_chunk(&mut self, entity: &EntitySchema, chunk: &Chunk) -> SinkResult<usize> {
        let mut txn = self.sink.begin_transaction()?;

        match txn.bulk_insert(entity, &chunk.records) {
            Ok(rows) => {
                txn.commit()?;
                Ok(rows)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback() {
                    warn!(
                        entity = entity.name,
                        chunk = chunk.number,
                        error = %rollback_err,
                        "回滚失败"
                    );
                }
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "非预期的状态迁移");
        }
        debug!(from = %self.state, to = %next, "状态迁移");
        self.state = next;
    }
}

/// 便捷入口: 对已打开的 Sink 执行计划
pub fn run_plan<S: Sink + ?Sized>(
    sink: &mut S,
    plan: &IngestPlan,
    options: ReaderOptions,
) -> RunOutcome {
    IngestOrchestrator::new(sink, options).run(plan)
}

/// 连接失败时的结果（未进入编排流程）
pub fn sink_unavailable(error: SinkError) -> RunOutcome {
    error!(error = %error, "无法连接数据库，入库中止");
    RunOutcome::Aborted {
        error: FatalError::SinkUnavailable(error),
        summary: RunSummary::default(),
    }
}
