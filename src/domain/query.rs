use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than a case-insensitive "desc" sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortField {
    Id,
    #[default]
    Name,
    Email,
    CreatedAt,
    Role,
}

impl UserSortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("id") => UserSortField::Id,
            Some("email") => UserSortField::Email,
            Some("createdAt") => UserSortField::CreatedAt,
            Some("role") => UserSortField::Role,
            _ => UserSortField::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSortField {
    Id,
    #[default]
    Name,
    Email,
    CreatedAt,
    AverageRating,
}

impl StoreSortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("id") => StoreSortField::Id,
            Some("email") => StoreSortField::Email,
            Some("createdAt") => StoreSortField::CreatedAt,
            Some("averageRating") => StoreSortField::AverageRating,
            _ => StoreSortField::Name,
        }
    }
}

/// Raw query string of `GET /api/admin/users`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Raw query string of `GET /api/admin/stores`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Raw query string of `GET /api/users/stores`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StoreSearchParams {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Cuts one page out of an already filtered and sorted list.
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let data = items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();
        Page {
            items: data,
            pagination: Pagination {
                total,
                page: self.page,
                page_size: self.limit,
                total_pages: total.div_ceil(self.limit as usize),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: usize,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Case-insensitive substring match; an absent or blank needle matches everything.
pub fn matches_filter(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}
