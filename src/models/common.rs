//! 分页结构、通用返回值与日期序列化

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 分页元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub last_page: u64,
}

/// 一页数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// 列表接口的几种返回形态：分页对象、包了一层数组的分页对象、纯数组
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Page(Paginated<T>),
    Nested(Vec<Paginated<T>>),
    Plain(Vec<T>),
}

impl<T> ListEnvelope<T> {
    /// 取出全部条目
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Page(page) => page.data,
            ListEnvelope::Nested(pages) => pages.into_iter().flat_map(|p| p.data).collect(),
            ListEnvelope::Plain(items) => items,
        }
    }

    /// 统一成分页对象；纯数组视为只有一页
    pub fn into_page(self) -> Paginated<T> {
        match self {
            ListEnvelope::Page(page) => page,
            ListEnvelope::Nested(mut pages) if !pages.is_empty() => pages.swap_remove(0),
            ListEnvelope::Nested(_) => Paginated {
                data: Vec::new(),
                meta: PageMeta {
                    total: 0,
                    page: 1,
                    last_page: 1,
                },
            },
            ListEnvelope::Plain(items) => {
                let total = items.len() as u64;
                Paginated {
                    data: items,
                    meta: PageMeta {
                        total,
                        page: 1,
                        last_page: 1,
                    },
                }
            }
        }
    }
}

/// 删除/作废类接口的返回：`{ message, state }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub state: Option<JsonValue>,
}

/// 日期字段：接受 `YYYY-MM-DD` 或完整的 RFC 3339 时间戳，输出 `YYYY-MM-DD`
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("fecha inválida: {}", raw)))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("fecha inválida: {}", raw))),
            }
        }
    }
}
