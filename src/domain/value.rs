// ==========================================
// 电商数据入库 - 字段值与记录
// ==========================================

use chrono::NaiveDateTime;
use rusqlite::types::{ToSql, ToSqlOutput, Value};
use std::collections::BTreeMap;

/// 规范化后的字段值（缺失值一律为 Null）
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// UTC 时间（无时区）
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FieldValue::Null => Ok(ToSqlOutput::Owned(Value::Null)),
            FieldValue::Integer(v) => Ok(ToSqlOutput::Owned(Value::Integer(*v))),
            FieldValue::Real(v) => Ok(ToSqlOutput::Owned(Value::Real(*v))),
            FieldValue::Text(s) => s.to_sql(),
            FieldValue::Timestamp(ts) => ts.to_sql(),
        }
    }
}

/// 一行记录: 规范化列名 → 值
///
/// 同名列（规范化后冲突）按插入顺序覆盖，最后声明的列生效。
pub type Record = BTreeMap<String, FieldValue>;
