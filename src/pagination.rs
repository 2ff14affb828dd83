use crate::routes::params::ProductQuery;

/// One page of store results with mongoose-paginate style navigation
/// metadata.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u64, total_items: u64, limit: u64) -> Self {
        // An empty result set still counts as one page.
        let total_pages = total_items.div_ceil(limit.max(1)).max(1);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;
        Self {
            items,
            page,
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }
}

/// Relative prev/next links for the products listing. A link is `None` when
/// the corresponding page does not exist; otherwise it targets the page and
/// echoes exactly the parameters the client originally supplied.
pub fn page_links<T>(page: &Page<T>, query: &ProductQuery) -> (Option<String>, Option<String>) {
    (
        page.prev_page.map(|p| listing_url(p, query)),
        page.next_page.map(|p| listing_url(p, query)),
    )
}

fn listing_url(page_num: u64, query: &ProductQuery) -> String {
    let mut url = format!("/products?pageNum={page_num}");
    for (key, value) in [
        ("limit", query.limit.as_deref()),
        ("product", query.product.as_deref()),
        ("category", query.category.as_deref()),
        ("status", query.status.as_deref()),
        ("sortByPrice", query.sort_by_price.as_deref()),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            url.push_str(&format!("&{key}={value}"));
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_a_single_page() {
        let page = Page::<()>::new(vec![], 1, 0, 10);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev_page);
        assert!(!page.has_next_page);
        assert_eq!(page.prev_page, None);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn middle_page_points_both_ways() {
        let page = Page::<()>::new(vec![], 2, 25, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.prev_page, Some(1));
        assert_eq!(page.next_page, Some(3));
    }

    #[test]
    fn absent_pages_yield_no_links() {
        let page = Page::<()>::new(vec![], 1, 5, 10);
        let (prev, next) = page_links(&page, &ProductQuery::default());
        assert_eq!(prev, None);
        assert_eq!(next, None);
    }

    #[test]
    fn links_echo_only_supplied_parameters() {
        let query = ProductQuery {
            limit: Some("1".into()),
            page_num: Some("1".into()),
            category: None,
            status: None,
            product: None,
            sort_by_price: None,
        };
        let page = Page::<()>::new(vec![], 1, 2, 1);
        let (prev, next) = page_links(&page, &query);
        assert_eq!(prev, None);
        assert_eq!(next.as_deref(), Some("/products?pageNum=2&limit=1"));
    }

    #[test]
    fn link_parameters_keep_a_fixed_order() {
        let query = ProductQuery {
            limit: Some("10".into()),
            page_num: Some("2".into()),
            category: Some("tea".into()),
            status: Some("true".into()),
            product: Some("earl".into()),
            sort_by_price: Some("asc".into()),
        };
        let page = Page::<()>::new(vec![], 2, 30, 10);
        let (prev, next) = page_links(&page, &query);
        assert_eq!(
            prev.as_deref(),
            Some("/products?pageNum=1&limit=10&product=earl&category=tea&status=true&sortByPrice=asc")
        );
        assert_eq!(
            next.as_deref(),
            Some("/products?pageNum=3&limit=10&product=earl&category=tea&status=true&sortByPrice=asc")
        );
    }

    #[test]
    fn empty_parameters_are_not_echoed() {
        let query = ProductQuery {
            limit: Some(String::new()),
            page_num: None,
            category: Some("juices".into()),
            status: None,
            product: None,
            sort_by_price: None,
        };
        let page = Page::<()>::new(vec![], 3, 40, 10);
        let (prev, _) = page_links(&page, &query);
        assert_eq!(prev.as_deref(), Some("/products?pageNum=2&category=juices"));
    }
}
