use std::collections::HashSet;

use super::Page;
use crate::models::ProductId;

/// Present once the search result grid has rendered.
pub const RESULTS_SELECTOR: &str = "div.s-main-slot.s-result-list";

/// Distinct, non-blank `data-asin` values in document order.
pub fn extract_product_ids(html: &str) -> Vec<ProductId> {
    let page = Page::parse(html);
    let mut seen = HashSet::new();

    page.query_all("[data-asin]")
        .into_iter()
        .filter_map(|element| element.value().attr("data-asin"))
        .map(str::trim)
        .filter(|asin| !asin.is_empty())
        .filter(|asin| seen.insert(asin.to_string()))
        .map(|asin| ProductId(asin.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_distinct_non_blank_ids() {
        let html = r#"
            <div class="s-main-slot s-result-list">
                <div data-asin="B001"></div>
                <div data-asin=""></div>
                <div data-asin="B002"><span data-asin="B001"></span></div>
                <div data-asin="  "></div>
            </div>"#;

        let ids = extract_product_ids(html);
        assert_eq!(
            ids,
            vec![ProductId("B001".to_string()), ProductId("B002".to_string())]
        );
    }
}
