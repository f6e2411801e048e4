use crate::domain::ports::PaginationSettings;
use crate::utils::error::{HerdError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PAGE_SIZE: usize = 50;

/// Page request as it arrives from a caller. Values are signed because they
/// come straight from query strings or flags and may be out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "first_page")]
    pub page_number: i64,
    #[serde(default)]
    pub page_size: Option<i64>,
}

fn first_page() -> i64 {
    1
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size: Some(page_size),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: first_page(),
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedView<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> PagedView<T> {
    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

struct PageWindow {
    start: usize,
    end: usize,
    metadata: PageMetadata,
}

impl PageWindow {
    fn into_view<T>(self, items: Vec<T>) -> PagedView<T> {
        let m = self.metadata;
        PagedView {
            items,
            total_count: m.total_count,
            page_size: m.page_size,
            current_page: m.current_page,
            total_pages: m.total_pages,
            has_previous: m.has_previous,
            has_next: m.has_next,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    max_page_size: usize,
    default_page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            default_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl Paginator {
    /// A paginator whose page ceiling is `max_page_size`; requests without a
    /// page size get the ceiling.
    pub fn new(max_page_size: usize) -> Result<Self> {
        Self::with_default_page_size(max_page_size, max_page_size)
    }

    pub fn with_default_page_size(max_page_size: usize, default_page_size: usize) -> Result<Self> {
        if max_page_size == 0 {
            return Err(HerdError::InvalidPageSize { requested: 0 });
        }
        if default_page_size == 0 {
            return Err(HerdError::InvalidPageSize { requested: 0 });
        }

        Ok(Self {
            max_page_size,
            default_page_size: default_page_size.min(max_page_size),
        })
    }

    pub fn from_settings<P: PaginationSettings + ?Sized>(settings: &P) -> Result<Self> {
        Self::with_default_page_size(settings.max_page_size(), settings.default_page_size())
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// 計算頁面邊界：頁碼最小為 1，頁面大小超過上限時改用上限
    fn window(&self, total_count: usize, page_number: i64, page_size: i64) -> Result<PageWindow> {
        if page_size <= 0 {
            return Err(HerdError::InvalidPageSize {
                requested: page_size,
            });
        }

        let page_size = usize::try_from(page_size)
            .unwrap_or(usize::MAX)
            .min(self.max_page_size);
        let current_page = usize::try_from(page_number.max(1)).unwrap_or(usize::MAX);
        let total_pages = total_count.div_ceil(page_size);

        let start = (current_page - 1)
            .saturating_mul(page_size)
            .min(total_count);
        let end = current_page.saturating_mul(page_size).min(total_count);

        tracing::debug!(
            "Page {} of {} (size {}, {} items): slice {}..{}",
            current_page,
            total_pages,
            page_size,
            total_count,
            start,
            end
        );

        Ok(PageWindow {
            start,
            end,
            metadata: PageMetadata {
                total_count,
                page_size,
                current_page,
                total_pages,
                has_previous: current_page > 1,
                has_next: current_page < total_pages,
            },
        })
    }

    pub fn paginate<T: Clone>(
        &self,
        items: &[T],
        page_number: i64,
        page_size: i64,
    ) -> Result<PagedView<T>> {
        let window = self.window(items.len(), page_number, page_size)?;
        let page = items[window.start..window.end].to_vec();
        Ok(window.into_view(page))
    }

    /// Same as [`Paginator::paginate`] but takes ownership, so no clones.
    pub fn paginate_owned<T>(
        &self,
        items: Vec<T>,
        page_number: i64,
        page_size: i64,
    ) -> Result<PagedView<T>> {
        let window = self.window(items.len(), page_number, page_size)?;
        let page = items
            .into_iter()
            .skip(window.start)
            .take(window.end - window.start)
            .collect();
        Ok(window.into_view(page))
    }

    pub fn paginate_request<T>(&self, items: Vec<T>, request: &PageRequest) -> Result<PagedView<T>> {
        let page_size = request
            .page_size
            .unwrap_or(i64::try_from(self.default_page_size).unwrap_or(i64::MAX));
        self.paginate_owned(items, request.page_number, page_size)
    }
}

/// Paginates with the default ceiling of 50.
pub fn paginate<T: Clone>(items: &[T], page_number: i64, page_size: i64) -> Result<PagedView<T>> {
    Paginator::default().paginate(items, page_number, page_size)
}
