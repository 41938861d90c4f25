// ==========================================
// 电商数据入库 - 数据清洗器
// ==========================================
// 职责: NULL 标准化 / 时间列强制转换 / 数值类型转换（文本不改写）
// 约束: 行级问题不报错: 无法解析的时间降级为 NULL，
//       无法解析的数值原样保留为文本，交由 sink 判定
// ==========================================

use crate::domain::{FieldType, FieldValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

/// 带时区的时间格式（转换为 UTC 后去掉时区）
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

/// 无时区的时间格式（视为 UTC）
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y%m%d%H%M%S",
];

/// 纯日期格式（取当日零点）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];

/// 单元格转换结果
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: FieldValue,
    /// 原值非空但转换失败、被降级为 NULL
    pub degraded: bool,
}

impl Coerced {
    fn ok(value: FieldValue) -> Self {
        Self {
            value,
            degraded: false,
        }
    }
}

pub struct DataCleaner {
    null_markers: HashSet<String>,
}

impl DataCleaner {
    pub fn new<I, S>(null_markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            null_markers: null_markers.into_iter().map(Into::into).collect(),
        }
    }

    /// 是否为缺失值（空白或 NA 标记）
    pub fn is_missing(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.null_markers.contains(trimmed)
    }

    /// 时间列转换: 缺失 → NULL；无法解析 → NULL（degraded）
    pub fn coerce_temporal(&self, raw: &str) -> Coerced {
        if self.is_missing(raw) {
            return Coerced::ok(FieldValue::Null);
        }
        match parse_timestamp(raw) {
            Some(ts) => Coerced::ok(FieldValue::Timestamp(ts)),
            None => Coerced {
                value: FieldValue::Null,
                degraded: true,
            },
        }
    }

    /// 按声明类型转换非时间列
    ///
    /// 数值解析失败时保留文本，不在读取层拦截
    pub fn coerce_typed(&self, raw: &str, field_type: Option<FieldType>) -> Coerced {
        if self.is_missing(raw) {
            return Coerced::ok(FieldValue::Null);
        }
        let trimmed = raw.trim();

        // 文本原样保留；数值只在解析时去空白
        let value = match field_type {
            Some(FieldType::Integer) => parse_integer(trimmed)
                .map(FieldValue::Integer)
                .unwrap_or_else(|| FieldValue::Text(raw.to_string())),
            Some(FieldType::Real) => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Real)
                .unwrap_or_else(|| FieldValue::Text(raw.to_string())),
            // 声明为时间戳但未被识别为时间列（declared 模式下不会出现）
            Some(FieldType::Timestamp) => return self.coerce_temporal(raw),
            Some(FieldType::Text) | None => FieldValue::Text(raw.to_string()),
        };
        Coerced::ok(value)
    }
}

/// 整数解析，兼容 "5.0" 这类整值浮点
fn parse_integer(value: &str) -> Option<i64> {
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    let f = value.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(f as i64)
    } else {
        None
    }
}

/// 尽力解析时间戳，统一为 UTC 无时区时间
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.naive_utc());
        }
    }

    // "2019-08-23 01:44:00 UTC" 形式
    let value = value
        .strip_suffix(" UTC")
        .or_else(|| value.strip_suffix('Z'))
        .unwrap_or(value);

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
