use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use review_harvest::browser::StaticBrowser;
use review_harvest::config::{CategoryConfig, Config};
use review_harvest::harvester::{
    product_page_url, reviews_page_url, search_page_url, write_json_atomically, Harvester,
};
use review_harvest::models::ProductId;
use review_harvest::normalizer::parse_records;

const BASE_URL: &str = "https://shop.test";
const SEARCH_URL: &str = "https://shop.test/s?k=phone";

const SEARCH_PAGE: &str = include_str!("fixtures/search_page.html");
const PRODUCT_PAGE: &str = include_str!("fixtures/product_page.html");
const REVIEWS_PAGE: &str = include_str!("fixtures/reviews_page.html");

fn id(raw: &str) -> ProductId {
    ProductId(raw.to_string())
}

fn test_config(max_pages: u32) -> Config {
    let mut config = Config::default();
    config.categories = vec![CategoryConfig {
        name: "Smartphones".to_string(),
        search_url: SEARCH_URL.to_string(),
    }];
    config.site.base_url = BASE_URL.to_string();
    config.harvest = config.harvest.without_pacing();
    config.harvest.max_pages = max_pages;
    config
}

/// Page 1 lists three products; page 2 never renders.
/// B0PHONE001 is complete, B0PHONE002 has no reviews, B0PHONE003 has no detail page.
fn fixture_browser() -> StaticBrowser {
    StaticBrowser::new()
        .with_page(search_page_url(SEARCH_URL, 1).unwrap(), SEARCH_PAGE)
        .with_page(product_page_url(BASE_URL, &id("B0PHONE001")).unwrap(), PRODUCT_PAGE)
        .with_page(reviews_page_url(BASE_URL, &id("B0PHONE001")).unwrap(), REVIEWS_PAGE)
        .with_page(
            product_page_url(BASE_URL, &id("B0PHONE002")).unwrap(),
            r#"<html><body><span id="productTitle">Budget Phone</span></body></html>"#,
        )
}

#[tokio::test]
async fn harvests_static_pages_end_to_end() {
    let browser = fixture_browser();
    let log = browser.log();

    let report = Harvester::new(test_config(2), Box::new(browser)).run().await;

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.pages_skipped, 1);
    assert_eq!(report.products_failed, 1);
    assert_eq!(log.quit_calls(), 1);

    let ids: Vec<_> = report.records.iter().map(|r| r.id.0.as_str()).collect();
    assert_eq!(ids, vec!["B0PHONE001", "B0PHONE002"]);

    let phone = &report.records[0];
    assert_eq!(phone.title, "Pocket Phone 12, 128GB, Unlocked & Ready");
    assert_eq!(phone.price, "1,299.00");
    assert_eq!(phone.rating, "4.6");
    assert_eq!(phone.review_count, 1234);
    assert_eq!(phone.category, "Smartphones");
    assert_eq!(phone.url, reviews_page_url(BASE_URL, &id("B0PHONE001")).unwrap());

    assert_eq!(phone.top_positive.customer_id, "RPOSITIVE1");
    assert_eq!(phone.top_positive.customer_name, "Ada L.");
    assert_eq!(phone.top_positive.influenced, 42);
    assert_eq!(phone.top_positive.date, NaiveDate::from_ymd_opt(2022, 6, 5));
    assert_eq!(phone.critical.customer_id, "RCRITICAL1");
    assert_eq!(phone.critical.comment_title, "Screen cracked in a week");
    assert_eq!(phone.critical.influenced, 1);
    assert_eq!(phone.critical.star_rating, 2.0);

    assert_eq!(phone.general.len(), 2);
    assert_eq!(phone.general[0].customer_id, "RGEN1");
    assert_eq!(phone.general[0].comment, "Great battery");
    assert_eq!(phone.general[0].buying_influence, 12);
    assert_eq!(phone.general[0].date, NaiveDate::from_ymd_opt(2023, 3, 1));
    assert_eq!(phone.general[1].comment, "Stopped charging");
    assert_eq!(phone.general[1].date, None);
}

#[tokio::test]
async fn missing_review_page_keeps_product_details() {
    let report = Harvester::new(test_config(1), Box::new(fixture_browser()))
        .run()
        .await;

    let budget = &report.records[1];
    assert_eq!(budget.title, "Budget Phone");
    assert_eq!(budget.price, "");
    assert_eq!(budget.review_count, 0);
    assert_eq!(budget.top_positive.customer_id, "None");
    assert!(budget.general.is_empty());
}

#[tokio::test]
async fn timed_out_search_pages_are_skipped_and_browser_quits_once() {
    let browser = StaticBrowser::new();
    let log = browser.log();

    let report = Harvester::new(test_config(3), Box::new(browser)).run().await;

    assert!(report.records.is_empty());
    assert_eq!(report.pages_visited, 0);
    assert_eq!(report.pages_skipped, 3);
    assert_eq!(log.quit_calls(), 1);
    assert_eq!(
        log.visited(),
        (1..=3)
            .map(|page| search_page_url(SEARCH_URL, page).unwrap())
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn products_are_visited_once_across_pages() {
    // Both result pages list the same products
    let browser = fixture_browser().with_page(search_page_url(SEARCH_URL, 2).unwrap(), SEARCH_PAGE);
    let log = browser.log();

    let report = Harvester::new(test_config(2), Box::new(browser)).run().await;

    assert_eq!(report.records.len(), 2);
    let product_visits = log
        .visited()
        .iter()
        .filter(|url| url.ends_with("/dp/B0PHONE001"))
        .count();
    assert_eq!(product_visits, 1);
}

#[tokio::test]
async fn harvest_output_round_trips_through_loader_input() {
    let report = Harvester::new(test_config(1), Box::new(fixture_browser()))
        .run()
        .await;

    let path = std::env::temp_dir().join(format!("review_harvest_{}.json", std::process::id()));
    write_json_atomically(&path, &report.records).unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let records = parse_records(&json).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text("Customer_1_Date").as_deref(), Some("2023-03-01T00:00:00"));
    assert_eq!(records[0].text("Customer_2_Date"), None);
    assert_eq!(records[0].text("price").as_deref(), Some("1,299.00"));
    assert!(!records[1].has_column("Customer_1_ID"));
}
