// ==========================================
// 电商数据入库 - 实体 Schema 描述
// ==========================================
// 职责: 以纯数据描述实体（表名/字段/类型/外键）
// 消费方: 建表 (ensure_schema) / 插入语句生成 / 依赖排序
// ==========================================

use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Timestamp,
}

impl FieldType {
    /// SQLite STRICT 表的列类型（时间戳以 TEXT 存储）
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldType::Integer => "INTEGER",
            FieldType::Real => "REAL",
            FieldType::Text | FieldType::Timestamp => "TEXT",
        }
    }
}

/// 字段定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
}

impl FieldDef {
    /// 普通可空字段
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            primary_key: false,
            unique: false,
            nullable: true,
        }
    }

    /// 整数主键
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Integer,
            primary_key: true,
            unique: false,
            nullable: false,
        }
    }

    /// 唯一约束（保持可空）
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// 外键定义: column → references_table(references_column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKeyDef {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// 实体 Schema
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySchema {
    /// 实体名（日志展示用）
    pub name: &'static str,
    /// 目标表名
    pub table: &'static str,
    /// 默认源文件名（相对于数据目录）
    pub source_file: &'static str,
    pub fields: &'static [FieldDef],
    pub foreign_keys: &'static [ForeignKeyDef],
}

impl EntitySchema {
    /// 按名称查找字段
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 本实体引用的表（去重，保持声明顺序）
    pub fn referenced_tables(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .filter(|t| *t != self.table && seen.insert(*t))
            .collect()
    }

    /// 生成建表语句
    pub fn create_table_sql(&self) -> String {
        let mut columns: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                let mut col = format!("{} {}", f.name, f.field_type.sql_type());
                if f.primary_key {
                    col.push_str(" PRIMARY KEY");
                } else {
                    if !f.nullable {
                        col.push_str(" NOT NULL");
                    }
                    if f.unique {
                        col.push_str(" UNIQUE");
                    }
                }
                col
            })
            .collect();

        for fk in self.foreign_keys {
            columns.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                fk.column, fk.references_table, fk.references_column
            ));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n) STRICT",
            self.table,
            columns.join(",\n    ")
        )
    }

    /// 生成插入语句（按字段声明顺序绑定 ?1..?N）
    ///
    /// 无 upsert：主键重复由 sink 报约束错误
    pub fn insert_sql(&self) -> String {
        let names: Vec<&str> = self.fields.iter().map(|f| f.name).collect();
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            names.join(", "),
            placeholders.join(", ")
        )
    }
}

impl fmt::Display for EntitySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 依赖排序错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("外键引用了未声明的表: {entity}.{column} -> {table}")]
    UnknownReference {
        entity: String,
        column: String,
        table: String,
    },

    #[error("实体依赖存在环: {0:?}")]
    DependencyCycle(Vec<String>),
}

/// 计算依赖顺序（Kahn 拓扑排序，同层按声明顺序）
///
/// 被引用的实体总是排在引用方之前；自引用外键不参与排序。
pub fn dependency_order(
    entities: &[&'static EntitySchema],
) -> Result<Vec<&'static EntitySchema>, SchemaError> {
    let index_by_table: HashMap<&str, usize> = entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.table, i))
        .collect();

    let mut in_degree = vec![0usize; entities.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); entities.len()];

    for (i, entity) in entities.iter().enumerate() {
        for fk in entity.foreign_keys {
            if fk.references_table == entity.table {
                continue;
            }
            if !index_by_table.contains_key(fk.references_table) {
                return Err(SchemaError::UnknownReference {
                    entity: entity.name.to_string(),
                    column: fk.column.to_string(),
                    table: fk.references_table.to_string(),
                });
            }
        }
        for table in entity.referenced_tables() {
            let dep = index_by_table[table];
            dependents[dep].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ordered = Vec::with_capacity(entities.len());
    let mut done = vec![false; entities.len()];

    // 每轮选声明顺序最靠前的就绪实体，保证结果稳定
    while ordered.len() < entities.len() {
        let next = (0..entities.len()).find(|&i| !done[i] && in_degree[i] == 0);
        let Some(i) = next else {
            let remaining = (0..entities.len())
                .filter(|&i| !done[i])
                .map(|i| entities[i].name.to_string())
                .collect();
            return Err(SchemaError::DependencyCycle(remaining));
        };

        done[i] = true;
        ordered.push(entities[i]);
        for &d in &dependents[i] {
            in_degree[d] -= 1;
        }
    }

    Ok(ordered)
}
