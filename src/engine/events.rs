// ==========================================
// 电商数据入库 - 运行状态与结果
// ==========================================
// 状态机: Idle → SchemaReady → Loading(0) → … → Loading(n-1) → Done
//         任一致命错误 → Aborted（无重试状态）
// ==========================================

use crate::importer::ImportError;
use crate::repository::SinkError;
use std::fmt;
use thiserror::Error;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    SchemaReady,
    /// 正在加载计划中的第 entity 个实体（0 起）
    Loading {
        entity: usize,
    },
    Done,
    Aborted,
}

impl RunState {
    /// 是否允许迁移到 next
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        match (*self, next) {
            (Idle, SchemaReady) | (Idle, Aborted) => true,
            (SchemaReady, Loading { entity: 0 }) | (SchemaReady, Done) => true,
            (Loading { entity: i }, Loading { entity: j }) => j == i + 1,
            (Loading { .. }, Done) | (Loading { .. }, Aborted) => true,
            (SchemaReady, Aborted) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Aborted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("Idle"),
            RunState::SchemaReady => f.write_str("SchemaReady"),
            RunState::Loading { entity } => write!(f, "Loading({})", entity),
            RunState::Done => f.write_str("Done"),
            RunState::Aborted => f.write_str("Aborted"),
        }
    }
}

/// 致命错误（中止整次运行）
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("Sink 不可用: {0}")]
    SinkUnavailable(SinkError),

    #[error("建表失败: {0}")]
    SchemaCreation(SinkError),

    #[error("源文件不可用 ({entity}): {source}")]
    SourceUnavailable {
        entity: String,
        #[source]
        source: ImportError,
    },
}

/// 单个数据块的结果
#[derive(Debug)]
pub struct ChunkOutcome {
    pub entity: &'static str,
    /// 块序号（1 起）
    pub chunk: usize,
    pub rows: usize,
    pub skipped_rows: usize,
    pub result: Result<usize, SinkError>,
}

impl ChunkOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// 单个实体的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySummary {
    pub entity: &'static str,
    pub chunks_loaded: usize,
    pub chunks_failed: usize,
    pub rows_loaded: usize,
    pub rows_failed: usize,
    pub rows_skipped: usize,
}

/// 整次运行的汇总
#[derive(Debug, Default)]
pub struct RunSummary {
    pub run_id: String,
    pub entities: Vec<EntitySummary>,
    pub chunks: Vec<ChunkOutcome>,
}

impl RunSummary {
    pub fn failed_chunks(&self) -> impl Iterator<Item = &ChunkOutcome> {
        self.chunks.iter().filter(|c| !c.is_success())
    }

    pub fn entity(&self, name: &str) -> Option<&EntitySummary> {
        self.entities.iter().find(|e| e.entity == name)
    }

    pub fn rows_loaded(&self) -> usize {
        self.entities.iter().map(|e| e.rows_loaded).sum()
    }
}

/// 运行结果
///
/// Completed 不区分"全部成功"与"部分块失败"，细节见 summary
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    Aborted {
        error: FatalError,
        /// 中止前已处理的部分
        summary: RunSummary,
    },
}

impl RunOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::Completed(summary) => summary,
            RunOutcome::Aborted { summary, .. } => summary,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RunOutcome::Aborted { .. })
    }

    pub fn fatal_error(&self) -> Option<&FatalError> {
        match self {
            RunOutcome::Aborted { error, .. } => Some(error),
            RunOutcome::Completed(_) => None,
        }
    }
}
