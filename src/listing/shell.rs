use super::{PagedSource, Searchable};
use crate::error::ApiResult;
use crate::utils::text::contains_ignore_case;
use tracing::debug;

/// 列表的查询状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    query: String,
    page: u64,
    per_page: u64,
}

impl ListingState {
    pub fn new(per_page: u64) -> Self {
        Self {
            query: String::new(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// 搜索词前后空白不算
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// 修改搜索词，页码回到 1。返回搜索词是否真的变了
    pub fn set_query(&mut self, query: &str) -> bool {
        self.page = 1;
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        true
    }

    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }
}

/// 渲染一页所需的全部数据
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub rows: Vec<T>,
    pub page: u64,
    pub total: u64,
    pub total_pages: u64,
    /// 总数不超过每页条数时不显示分页控件
    pub show_pagination: bool,
}

impl<T> ListView<T> {
    fn new(rows: Vec<T>, page: u64, total: u64, per_page: u64) -> Self {
        let total_pages = total.div_ceil(per_page).max(1);
        Self {
            rows,
            page,
            total,
            total_pages,
            show_pagination: total > per_page,
        }
    }
}

/// 双模式列表
///
/// 搜索模式下全量数据只拉一次，之后翻页、改搜索词都在本地完成；
/// 清空搜索词或调用 `refresh` 后缓存失效
pub struct ListingShell<S: PagedSource> {
    source: S,
    state: ListingState,
    cache: Option<Vec<S::Item>>,
}

impl<S: PagedSource> ListingShell<S> {
    pub fn new(source: S, per_page: u64) -> Self {
        Self {
            source,
            state: ListingState::new(per_page),
            cache: None,
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.set_query(query);
        if !self.state.is_searching() {
            self.cache = None;
        }
    }

    pub fn set_page(&mut self, page: u64) {
        self.state.set_page(page);
    }

    /// 丢弃本地缓存（例如新增或删除记录之后）
    pub fn refresh(&mut self) {
        self.cache = None;
    }

    pub async fn load(&mut self) -> ApiResult<ListView<S::Item>> {
        let page = self.state.page();
        let per_page = self.state.per_page();

        if !self.state.is_searching() {
            let result = self.source.fetch_page(page, per_page).await?;
            debug!(
                "📄 第 {} 页，共 {} 条 (服务端分页)",
                result.meta.page, result.meta.total
            );
            return Ok(ListView::new(result.data, page, result.meta.total, per_page));
        }

        if self.cache.is_none() {
            self.cache = Some(self.source.fetch_all().await?);
        }
        let needle = self.state.query().trim();
        let matched: Vec<S::Item> = self
            .cache
            .iter()
            .flatten()
            .filter(|item| contains_ignore_case(&item.search_text(), needle))
            .cloned()
            .collect();

        let total = matched.len() as u64;
        // 页码来自界面，超出范围时得到空页
        let skip = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);
        let rows = matched.into_iter().skip(skip).take(take).collect();
        debug!("🔎 \"{}\" 匹配 {} 条 (本地过滤)", needle, total);
        Ok(ListView::new(rows, page, total, per_page))
    }
}
