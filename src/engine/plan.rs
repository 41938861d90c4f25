// ==========================================
// 电商数据入库 - 加载计划
// ==========================================
// 职责: 有序的 (实体, 源文件) 列表
// 约束: 被引用的实体必须排在引用方之前（不在计划中的实体不受约束）
// ==========================================

use crate::config::IngestConfig;
use crate::domain::{dependency_order, EntitySchema, SchemaError, ALL_ENTITIES};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// 计划错误
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("加载顺序违反外键依赖: {entity} 依赖的 {depends_on} 排在其后")]
    OutOfOrder { entity: String, depends_on: String },

    #[error("实体重复出现在计划中: {0}")]
    DuplicateEntity(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// 单个加载步骤
#[derive(Debug, Clone)]
pub struct LoadStep {
    pub entity: &'static EntitySchema,
    pub path: PathBuf,
}

/// 加载计划
#[derive(Debug, Clone)]
pub struct IngestPlan {
    steps: Vec<LoadStep>,
}

impl IngestPlan {
    /// 从显式步骤构造并校验顺序
    pub fn new(steps: Vec<LoadStep>) -> Result<Self, PlanError> {
        let planned: HashSet<&str> = steps.iter().map(|s| s.entity.table).collect();
        if planned.len() != steps.len() {
            let mut seen = HashSet::new();
            let dup = steps
                .iter()
                .find(|s| !seen.insert(s.entity.table))
                .map(|s| s.entity.name.to_string())
                .unwrap_or_default();
            return Err(PlanError::DuplicateEntity(dup));
        }

        let mut loaded: HashSet<&str> = HashSet::new();
        for step in &steps {
            for table in step.entity.referenced_tables() {
                if planned.contains(table) && !loaded.contains(table) {
                    return Err(PlanError::OutOfOrder {
                        entity: step.entity.name.to_string(),
                        depends_on: table.to_string(),
                    });
                }
            }
            loaded.insert(step.entity.table);
        }

        Ok(Self { steps })
    }

    /// 按依赖顺序为给定实体生成计划，源文件位于 data_dir 下
    pub fn for_entities(
        entities: &[&'static EntitySchema],
        config: &IngestConfig,
    ) -> Result<Self, PlanError> {
        let steps = dependency_order(entities)?
            .into_iter()
            .map(|entity| LoadStep {
                entity,
                path: config.source_path(entity.source_file),
            })
            .collect();
        Self::new(steps)
    }

    /// 全部六个实体的默认计划
    pub fn from_config(config: &IngestConfig) -> Result<Self, PlanError> {
        Self::for_entities(&ALL_ENTITIES, config)
    }

    pub fn steps(&self) -> &[LoadStep] {
        &self.steps
    }

    pub fn entities(&self) -> Vec<&'static EntitySchema> {
        self.steps.iter().map(|s| s.entity).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
