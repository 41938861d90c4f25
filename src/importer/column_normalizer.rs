// ==========================================
// 电商数据入库 - 列名规范化
// ==========================================
// 规则: 小写 → 去首尾空白 → 删除 [a-z0-9_] 以外的字符
// 规范化后重名不去重，由记录映射按"后者覆盖"处理
// ==========================================

/// 规范化单个列名
pub fn normalize_column_name(raw: &str) -> String {
    raw.to_lowercase()
        .trim()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}

/// 规范化整行表头（保持顺序与长度）
pub fn normalize_headers<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    headers.into_iter().map(normalize_column_name).collect()
}

/// 时间列启发式: 规范化列名包含 "at"
pub fn looks_temporal(normalized: &str) -> bool {
    normalized.contains("at")
}
