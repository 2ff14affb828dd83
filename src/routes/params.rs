use serde::Deserialize;
use utoipa::ToSchema;

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;

/// Raw query string for the products listing. Values are kept exactly as the
/// client sent them; `normalize` applies defaults and drops anything
/// unparseable instead of rejecting the request.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub limit: Option<String>,
    pub page_num: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub product: Option<String>,
    pub sort_by_price: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Filter plus pagination directive ready for the store query.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    pub limit: u64,
    pub page: u64,
    pub category: Option<String>,
    pub status: Option<bool>,
    pub title: Option<String>,
    pub sort: Option<SortOrder>,
}

impl ProductQuery {
    pub fn normalize(&self) -> NormalizedQuery {
        NormalizedQuery {
            limit: parse_or(self.limit.as_deref(), DEFAULT_LIMIT),
            page: parse_or(self.page_num.as_deref(), DEFAULT_PAGE),
            category: non_empty(self.category.as_deref()),
            status: self.status.as_deref().and_then(|s| s.parse::<bool>().ok()),
            title: non_empty(self.product.as_deref()),
            sort: self.sort_by_price.as_deref().and_then(SortOrder::parse),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

fn parse_or(value: Option<&str>, default: u64) -> u64 {
    value.and_then(|s| s.parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_uses_defaults() {
        let normalized = ProductQuery::default().normalize();
        assert_eq!(normalized.limit, DEFAULT_LIMIT);
        assert_eq!(normalized.page, DEFAULT_PAGE);
        assert_eq!(normalized.category, None);
        assert_eq!(normalized.status, None);
        assert_eq!(normalized.title, None);
        assert_eq!(normalized.sort, None);
    }

    #[test]
    fn supplied_values_pass_through() {
        let query = ProductQuery {
            limit: Some("5".into()),
            page_num: Some("3".into()),
            category: Some("coffee".into()),
            status: Some("true".into()),
            product: Some("latte".into()),
            sort_by_price: Some("desc".into()),
        };
        let normalized = query.normalize();
        assert_eq!(normalized.limit, 5);
        assert_eq!(normalized.page, 3);
        assert_eq!(normalized.category.as_deref(), Some("coffee"));
        assert_eq!(normalized.status, Some(true));
        assert_eq!(normalized.title.as_deref(), Some("latte"));
        assert_eq!(normalized.sort, Some(SortOrder::Desc));
    }

    // Invalid values never fail the request; each dimension just loses its
    // filter.
    #[test]
    fn unparseable_values_fall_back() {
        let query = ProductQuery {
            limit: Some("lots".into()),
            page_num: Some("-2".into()),
            category: Some(String::new()),
            status: Some("banana".into()),
            product: Some(String::new()),
            sort_by_price: Some("upwards".into()),
        };
        let normalized = query.normalize();
        assert_eq!(normalized.limit, DEFAULT_LIMIT);
        assert_eq!(normalized.page, DEFAULT_PAGE);
        assert_eq!(normalized.category, None);
        assert_eq!(normalized.status, None);
        assert_eq!(normalized.title, None);
        assert_eq!(normalized.sort, None);
    }
}
