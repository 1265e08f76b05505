//! 列表外壳：分页 + 搜索
//!
//! 没有搜索词时按页向服务端要数据；有搜索词时一次性拉取全部数据，
//! 在本地做不区分大小写的子串过滤，再对过滤结果分页。
//! 学生、监护人、报名、意向学员列表共用这一套逻辑。

mod shell;
mod sources;

pub use shell::{ListView, ListingShell, ListingState};

use crate::error::ApiResult;
use crate::models::Paginated;
use async_trait::async_trait;

/// 可被本地搜索的条目
pub trait Searchable {
    /// 参与匹配的文本（若干显示字段拼接）
    fn search_text(&self) -> String;
}

/// 可分页读取的数据源
#[async_trait]
pub trait PagedSource: Send + Sync {
    type Item: Searchable + Clone + Send + Sync;

    async fn fetch_page(&self, page: u64, limit: u64) -> ApiResult<Paginated<Self::Item>>;

    async fn fetch_all(&self) -> ApiResult<Vec<Self::Item>>;
}
