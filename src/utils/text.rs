//! 文本辅助函数：空串归一、模糊匹配

/// 去掉首尾空白后为空则视为未填写
pub fn nil_if_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 对 `Option<String>` 字段做同样的归一化
pub fn strip_empty(value: &mut Option<String>) {
    *value = nil_if_empty(value.as_deref());
}

/// 不区分大小写的子串匹配
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
