use std::time::Duration;

use pokemon_tcg_scraper::models::SuperType;
use pokemon_tcg_scraper::{CardRecord, CardScraper, ScrapeError, ScraperConfig, SearchQuery};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/us/pokemon-tcg/pokemon-cards/";

fn html(markup: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(markup.to_string(), "text/html; charset=utf-8")
}

fn scraper_for(server: &MockServer) -> CardScraper {
    CardScraper::new(ScraperConfig {
        base_url: server.uri(),
        page_delay: Duration::ZERO,
        ..ScraperConfig::default()
    })
    .expect("client builds")
}

async fn mount_search_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("cardName", "saur"))
        .respond_with(html(include_str!("fixtures/search_page_1.html")))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{SEARCH_PATH}2")))
        .and(query_param("cardName", "saur"))
        .respond_with(html(include_str!("fixtures/search_page_2.html")))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_card(server: &MockServer, card_path: &str, markup: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{SEARCH_PATH}{card_path}")))
        .respond_with(html(markup))
        .mount(server)
        .await;
}

async fn mount_all_cards(server: &MockServer) {
    mount_card(server, "bw-series/bwp/BW01/", include_str!("fixtures/snivy.html")).await;
    mount_card(server, "xy-series/xy1/1/", include_str!("fixtures/ivysaur.html")).await;
    mount_card(server, "xy-series/xy1/2/", include_str!("fixtures/m_venusaur_ex.html")).await;
    mount_card(server, "bw-series/bwp/BW100/", include_str!("fixtures/n_trainer.html")).await;
}

fn saur() -> SearchQuery {
    SearchQuery::new().with("cardName", "saur")
}

#[tokio::test]
async fn scrape_all_keeps_page_then_document_order() {
    let server = MockServer::start().await;
    mount_search_pages(&server).await;

    let records = scraper_for(&server).scrape_all(&saur(), false).await.unwrap();

    let ids: Vec<_> = records.iter().map(CardRecord::id).collect();
    assert_eq!(ids, ["bwp/BW01", "xy1/1", "xy1/2", "bwp/BW100"]);
    assert!(records.iter().all(|r| matches!(r, CardRecord::Reference(_))));
    assert_eq!(
        records[3].url(),
        format!("{}{SEARCH_PATH}bw-series/bwp/BW100/", server.uri())
    );
}

#[tokio::test]
async fn scrape_all_merges_card_details() {
    let server = MockServer::start().await;
    mount_search_pages(&server).await;
    mount_all_cards(&server).await;

    let records = scraper_for(&server).scrape_all(&saur(), true).await.unwrap();
    let cards: Vec<_> = records.iter().map(|r| r.as_card().unwrap()).collect();

    let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Snivy", "Ivysaur", "M-Venusaur-EX", "N"]);

    let snivy = cards[0].pokemon().unwrap();
    assert_eq!(snivy.hp, 60);
    assert_eq!(snivy.abilities[0].name, "Slam");

    assert!(cards.iter().filter_map(|c| c.pokemon()).any(|details| {
        details
            .abilities
            .iter()
            .any(|attack| attack.name == "Vine Whip")
    }));

    assert_eq!(cards[3].super_type(), SuperType::Trainer);
    assert!(cards[3].text().unwrap().contains("Prize cards"));
}

#[tokio::test]
async fn zero_matches_stop_after_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(html(include_str!("fixtures/search_empty.html")))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new().with("cardName", "missingno");
    let records = scraper_for(&server).scrape_all(&query, false).await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn failing_card_aborts_the_run() {
    let server = MockServer::start().await;
    mount_search_pages(&server).await;
    mount_card(&server, "bw-series/bwp/BW01/", include_str!("fixtures/snivy.html")).await;
    Mock::given(method("GET"))
        .and(path(format!("{SEARCH_PATH}xy-series/xy1/1/")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = scraper_for(&server)
        .scrape_all(&saur(), true)
        .await
        .unwrap_err();

    match err {
        ScrapeError::Fetch {
            url, status_code, ..
        } => {
            assert_eq!(status_code, Some(500));
            assert!(url.ends_with("/xy-series/xy1/1/"));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_search_page_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = scraper_for(&server)
        .scrape_all(&saur(), false)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn search_and_detail_agree_on_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(html(include_str!("fixtures/search_page_1.html")))
        .mount(&server)
        .await;
    mount_all_cards(&server).await;
    let scraper = scraper_for(&server);

    let page = scraper
        .scrape_search_page(&format!("{}{SEARCH_PATH}?cardName=saur", server.uri()))
        .await
        .unwrap();
    assert_eq!(page.total_pages, 2);

    for reference in &page.cards {
        let card = scraper.scrape_card(&reference.url).await.unwrap();
        assert_eq!(card.id, reference.id);
        assert_eq!(card.url, reference.url);
    }
}
