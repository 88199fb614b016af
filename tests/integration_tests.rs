//! Integration tests for the estuary client core.
//!
//! These exercise the full path from the HTTP data source through the
//! pagination controller and the feed overview, against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use estuary::config::Config;
use estuary::overview::{OverviewConfig, OverviewLoader};
use estuary::pager::{LoadOutcome, PagerConfig};
use estuary::ranking::RankingConfig;
use estuary::source::{ArticleSource, HttpArticleSource, PageScope, pager_for};
use estuary::store::{LastReadStore, SqliteLastReadStore};

fn article_json(i: usize, published_at: &str) -> Value {
    json!({
        "id": format!("a-{i}"),
        "title": format!("Article {i}"),
        "description": "A description",
        "sourceUrl": format!("https://example.com/articles/{i}"),
        "sourceType": "rss",
        "tags": ["news"],
        "publishedAt": published_at,
        "save": false
    })
}

fn articles_json(from: usize, to: usize) -> Value {
    Value::Array(
        (from..to)
            .map(|i| article_json(i, "2025-07-01T00:00:00Z"))
            .collect(),
    )
}

async fn source_for(server: &MockServer) -> Arc<dyn ArticleSource> {
    let base = format!("{}/api", server.uri());
    Arc::new(HttpArticleSource::new(&base, Duration::from_secs(5)).unwrap())
}

async fn mount_page(server: &MockServer, route: &str, from: usize, to: usize, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("from", from.to_string()))
        .and(query_param("to", to.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

mod pagination {
    use super::*;

    #[tokio::test]
    async fn test_windows_walk_the_backend_result_set() {
        let server = MockServer::start().await;
        mount_page(&server, "/api/articles/feed", 0, 20, articles_json(0, 20)).await;
        mount_page(&server, "/api/articles/feed", 20, 40, articles_json(20, 25)).await;
        mount_page(&server, "/api/articles/feed", 25, 45, json!([])).await;

        let source = source_for(&server).await;
        let pager = pager_for(source, PageScope::Home, &PagerConfig::default());

        assert_eq!(pager.load_initial().await, LoadOutcome::Loaded(20));
        assert_eq!(pager.load_more().await, LoadOutcome::Loaded(5));
        assert_eq!(pager.len(), 25);

        // The next window starts at the real list length, and an empty
        // page is the end of the list, not an error.
        assert_eq!(pager.load_more().await, LoadOutcome::EndOfList);
        assert_eq!(pager.len(), 25);
        assert!(!pager.has_error());
    }

    #[tokio::test]
    async fn test_failed_initial_load_is_empty_with_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/history"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        let pager = pager_for(source, PageScope::History, &PagerConfig::default());

        assert_eq!(pager.load_initial().await, LoadOutcome::Failed);
        assert!(pager.is_empty());
        assert!(pager.has_error());
    }

    #[tokio::test]
    async fn test_failed_continuation_keeps_items_and_retries() {
        let server = MockServer::start().await;
        mount_page(&server, "/api/articles/saved", 0, 20, articles_json(0, 20)).await;

        let source = source_for(&server).await;
        let pager = pager_for(source, PageScope::Saved, &PagerConfig::default());
        pager.load_initial().await;

        // No mock for [20, 40): the backend 404s and the page load fails.
        assert_eq!(pager.load_more().await, LoadOutcome::Failed);
        assert_eq!(pager.len(), 20);
        assert!(pager.has_error());

        mount_page(&server, "/api/articles/saved", 20, 40, articles_json(20, 40)).await;
        assert_eq!(pager.load_more().await, LoadOutcome::Loaded(20));
        assert_eq!(pager.len(), 40);
        assert!(!pager.has_error());
    }

    #[tokio::test]
    async fn test_single_feed_scope_addresses_feed_route() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/api/articles/feed/f-7",
            0,
            20,
            articles_json(0, 3),
        )
        .await;

        let source = source_for(&server).await;
        let pager = pager_for(
            source,
            PageScope::Feed("f-7".to_string()),
            &PagerConfig::default(),
        );

        assert_eq!(pager.load_initial().await, LoadOutcome::Loaded(3));
    }
}

mod mutations {
    use super::*;

    #[tokio::test]
    async fn test_mark_read_awaits_sink_then_mirrors_locally() {
        let server = MockServer::start().await;
        mount_page(&server, "/api/articles/feed", 0, 20, articles_json(0, 5)).await;
        Mock::given(method("PATCH"))
            .and(path("/api/articles/a-3/read"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        let pager = pager_for(source.clone(), PageScope::Home, &PagerConfig::default());
        pager.load_initial().await;

        // The sink resolves first; only then does local state mirror it.
        source.mark_read("a-3").await.unwrap();
        assert!(pager.apply_read("a-3", Utc::now()));

        let items = pager.items();
        assert!(items[3].is_read());
        assert_eq!(items[3].id, "a-3");
        // Position and neighbors untouched.
        let ids: Vec<&str> = items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a-0", "a-1", "a-2", "a-3", "a-4"]);
        assert!(!items[2].is_read());
    }

    #[tokio::test]
    async fn test_set_saved_sends_flag_and_mirrors() {
        let server = MockServer::start().await;
        mount_page(&server, "/api/articles/saved", 0, 20, articles_json(0, 2)).await;
        Mock::given(method("PATCH"))
            .and(path("/api/articles/a-1/saved"))
            .and(query_param("saved", "false"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        let pager = pager_for(source.clone(), PageScope::Saved, &PagerConfig::default());
        pager.load_initial().await;

        source.set_saved("a-1", false).await.unwrap();
        assert!(pager.apply_saved("a-1", false));
        assert!(!pager.items()[1].saved);
    }

    #[tokio::test]
    async fn test_failed_sink_call_surfaces_before_any_mirror() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/articles/a-1/read"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = source_for(&server).await;
        assert!(source.mark_read("a-1").await.is_err());
    }
}

mod overview {
    use super::*;

    fn feed_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "url": format!("https://example.com/{id}/feed.xml")
        })
    }

    async fn mount_sample(server: &MockServer, feed_id: &str, body: Value) {
        mount_page(server, &format!("/api/articles/feed/{feed_id}"), 0, 5, body).await;
    }

    #[tokio::test]
    async fn test_overview_ranks_and_flags_unread_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feeds"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([feed_json("f-slow", "Slow"), feed_json("f-fast", "Fast")])),
            )
            .mount(&server)
            .await;

        let yesterday = (Utc::now() - chrono::Duration::days(1)).to_rfc3339();
        let last_month = (Utc::now() - chrono::Duration::days(30)).to_rfc3339();
        mount_sample(
            &server,
            "f-fast",
            json!([article_json(1, &yesterday)]),
        )
        .await;
        mount_sample(
            &server,
            "f-slow",
            json!([article_json(2, &last_month)]),
        )
        .await;

        let source = source_for(&server).await;
        let last_read: Arc<dyn LastReadStore> = Arc::new(SqliteLastReadStore::in_memory().unwrap());
        last_read.set("f-fast", Utc::now()).unwrap();

        let loader = OverviewLoader::new(
            source,
            last_read,
            RankingConfig::default(),
            &OverviewConfig::default(),
        );
        let entries = loader.load(Utc::now()).await.unwrap();

        let order: Vec<&str> = entries.iter().map(|e| e.feed.id.as_str()).collect();
        assert_eq!(order, ["f-fast", "f-slow"]);
        // Fast feed was read after its latest article; slow one never was.
        assert!(!entries[0].has_unread);
        assert!(entries[1].has_unread);
    }
}

mod config {
    use super::*;

    #[test]
    fn test_config_defaults_cover_every_section() {
        let config = Config::default();
        assert_eq!(config.pager.page_size, 20);
        assert!(config.pager.dedupe_appends);
        assert_eq!(config.overview.sample_size, 5);
        assert_eq!(config.api.timeout_secs, 10);
    }
}
