//! Integration tests for the indexer
//!
//! These tests use wiremock to serve a miniature documentation site and run
//! the full index cycle end-to-end.

use cppref_indexer::config::{
    Config, DuplicatePolicy, FetcherConfig, IndexConfig, IndexMode, OutputConfig, SiteConfig,
    UnreachablePolicy,
};
use cppref_indexer::output::{write_with_fallback, ScriptWriter, WriteOutcome};
use cppref_indexer::{run_index, IndexerError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, data_path: &str) -> Config {
    Config {
        site: SiteConfig {
            root: base_url.to_string(),
            link_prefix: format!("{}/w/cpp/", base_url),
        },
        index: IndexConfig {
            root_url: format!("{}/w/cpp/symbol_index", base_url),
            namespace: "std".to_string(),
            mode: IndexMode::Namespace,
            duplicate_policy: DuplicatePolicy::DropAll,
            on_unreachable: UnreachablePolicy::Abort,
        },
        fetcher: FetcherConfig {
            min_request_interval: 10, // Very short for testing
            max_attempts: 2,
            timeout: 5,
            user_agent: "TestBot/1.0".to_string(),
        },
        output: OutputConfig {
            data_path: data_path.to_string(),
            log_path: "unused.log".to_string(),
        },
    }
}

fn symbol_index_page(lines: &[&str]) -> String {
    let mut page = vec![
        "<html><body>",
        "<p>This page tries to list all the symbols that are available from the Standard Library.</p>",
    ];
    page.extend_from_slice(lines);
    page.push(r#"<h3><span class="mw-headline" id="See_also">See also</span></h3>"#);
    page.push("</body></html>");
    page.join("\n")
}

fn container_page(lines: &[&str]) -> String {
    let mut page = vec![
        "<html><body>",
        r#"<h3><span class="mw-headline" id="Member_functions">Member functions</span></h3>"#,
    ];
    page.extend_from_slice(lines);
    page.push(r#"<h3><span class="mw-headline" id="See_also">See also</span></h3>"#);
    page.push("</body></html>");
    page.join("\n")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a small site: free functions, one container, one nested namespace
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/w/cpp/symbol_index",
        symbol_index_page(&[
            r#"<a href="/w/cpp/algorithm/sort" title="cpp/algorithm/sort"><tt>sort()</tt></a>"#,
            r#"<a href="/w/cpp/container/vector" title="cpp/container/vector"><tt>vector</tt></a>"#,
            r#"<a href="/w/cpp/symbol_index/chrono" title="cpp/symbol_index/chrono"><code>chrono</code></a>"#,
            r#"<a href="/w/cpp/utility/pair/make_pair" title="cpp/utility/pair/make_pair"><tt>make_pair&lt;&gt;()</tt></a>"#,
            r#"<a href="/mwiki/index.php?title=cpp/missing&action=edit"><tt>unwritten()</tt></a>"#,
        ]),
    )
    .await;

    mount_page(
        server,
        "/w/cpp/container/vector",
        container_page(&[
            r#"<td><a href="/w/cpp/container/vector/begin" title="cpp/container/vector/begin"><span class="t-lines"><span>begin</span><span>cbegin</span></span></a></td>"#,
            r#"<td><a href="/w/cpp/container/vector/size" title="cpp/container/vector/size"><span>size</span></a></td>"#,
        ]),
    )
    .await;

    mount_page(
        server,
        "/w/cpp/symbol_index/chrono",
        symbol_index_page(&[
            r#"<a href="/w/cpp/chrono/duration_cast" title="cpp/chrono/duration_cast"><tt>duration_cast()</tt></a>"#,
            r#"<a href="/w/cpp/algorithm/sort" title="cpp/algorithm/sort"><tt>sort()</tt></a>"#,
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_full_index_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let data_path = temp_dir.path().join("data.json");
    let config = create_test_config(&base_url, &data_path.display().to_string());

    let run = run_index(&config).await.expect("Index run failed");

    let names: Vec<&str> = run
        .table
        .iter()
        .map(|t| t.qualified_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "std::chrono::duration_cast",
            "std::chrono::sort",
            "std::make_pair",
            "std::sort",
            "std::vector",
            "std::vector::begin",
            "std::vector::cbegin",
            "std::vector::size",
        ]
    );

    let begin = &run.table[5];
    assert_eq!(begin.link, format!("{}/w/cpp/container/vector/begin", base_url));

    // Each page is fetched exactly once
    assert_eq!(run.statistics.fetch.network_requests, 3);
    assert_eq!(run.statistics.pages_indexed, 3);
    assert_eq!(run.statistics.anchors_discarded, 1);
    assert_eq!(run.statistics.final_entries, 8);
    assert_eq!(run.statistics.duplicates_removed, 0);

    let writer = ScriptWriter::new(&data_path, "std", &config.site.link_prefix);
    let mut fallback = Vec::new();
    let outcome = write_with_fallback(&writer, &run.table, &mut fallback).unwrap();
    assert_eq!(outcome, WriteOutcome::Persisted);

    let script = std::fs::read_to_string(&data_path).unwrap();
    assert!(script.starts_with("const stlData = {\n\t\"chrono::duration_cast\": \"chrono/duration_cast\","));
    assert!(script.contains("\n\t\"vector::begin\": \"container/vector/begin\","));
    assert!(script.ends_with("\n\t\"vector::size\": \"container/vector/size\"\n};"));
}

#[tokio::test]
async fn test_duplicate_names_are_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/w/cpp/symbol_index",
        symbol_index_page(&[
            r#"<a href="/w/cpp/iterator/begin"><tt>begin()</tt></a>"#,
            r#"<a href="/w/cpp/iterator/end"><tt>end()</tt></a>"#,
            r#"<a href="/w/cpp/ranges/begin"><tt>begin()</tt></a>"#,
        ]),
    )
    .await;

    let config = create_test_config(&base_url, "unused.json");
    let run = run_index(&config).await.unwrap();

    assert_eq!(run.table.len(), 1);
    assert_eq!(run.table[0].qualified_name, "std::end");
    assert_eq!(run.statistics.entries_collected, 3);
    assert_eq!(run.statistics.duplicates_removed, 2);
}

#[tokio::test]
async fn test_keep_first_duplicate_policy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/w/cpp/symbol_index",
        symbol_index_page(&[
            r#"<a href="/w/cpp/iterator/begin"><tt>begin()</tt></a>"#,
            r#"<a href="/w/cpp/ranges/begin"><tt>begin()</tt></a>"#,
        ]),
    )
    .await;

    let mut config = create_test_config(&base_url, "unused.json");
    config.index.duplicate_policy = DuplicatePolicy::KeepFirst;
    let run = run_index(&config).await.unwrap();

    assert_eq!(run.table.len(), 1);
    assert_eq!(
        run.table[0].link,
        format!("{}/w/cpp/iterator/begin", base_url)
    );
}

#[tokio::test]
async fn test_aliased_container_members_indexed_under_each_name() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/w/cpp/symbol_index",
        symbol_index_page(&[
            r#"<a href="/w/cpp/string/basic_string"><tt>basic_string</tt></a>"#,
            r#"<a href="/w/cpp/string/basic_string"><tt>string</tt></a>"#,
            r#"<a href="/w/cpp/string/basic_string"><tt>wstring</tt></a>"#,
        ]),
    )
    .await;

    // Fetched once; the aliases are served from the cache
    mount_page(
        &mock_server,
        "/w/cpp/string/basic_string",
        container_page(&[r#"<a href="/w/cpp/string/basic_string/append"><span>append</span></a>"#]),
    )
    .await;

    let config = create_test_config(&base_url, "unused.json");
    let run = run_index(&config).await.unwrap();

    let names: Vec<&str> = run
        .table
        .iter()
        .map(|t| t.qualified_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "std::basic_string",
            "std::basic_string::append",
            "std::string",
            "std::string::append",
            "std::wstring",
            "std::wstring::append",
        ]
    );
    assert_eq!(run.statistics.fetch.network_requests, 2);
    assert_eq!(run.statistics.fetch.cache_hits, 2);
}

#[tokio::test]
async fn test_container_mode() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/w/cpp/container/map",
        container_page(&[
            r#"<a href="/w/cpp/container/map/at"><span>at</span></a>"#,
            r#"<a href="/w/cpp/container/map/operator_at"><span>operator[]</span></a>"#,
        ]),
    )
    .await;

    let mut config = create_test_config(&base_url, "unused.json");
    config.index.mode = IndexMode::Container;
    config.index.root_url = format!("{}/w/cpp/container/map", base_url);
    config.index.namespace = "std::map".to_string();

    let run = run_index(&config).await.unwrap();

    let names: Vec<&str> = run
        .table
        .iter()
        .map(|t| t.qualified_name.as_str())
        .collect();
    assert_eq!(names, vec!["std::map::at", "std::map::operator[]"]);
}

#[tokio::test]
async fn test_missing_page_contributes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/w/cpp/symbol_index",
        symbol_index_page(&[
            r#"<a href="/w/cpp/container/gone"><tt>gone</tt></a>"#,
            r#"<a href="/w/cpp/algorithm/find"><tt>find()</tt></a>"#,
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/w/cpp/container/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "unused.json");
    let run = run_index(&config).await.unwrap();

    let names: Vec<&str> = run
        .table
        .iter()
        .map(|t| t.qualified_name.as_str())
        .collect();
    assert_eq!(names, vec!["std::find", "std::gone"]);
    assert_eq!(run.statistics.pages_failed, 1);
    assert_eq!(run.statistics.fetch.not_found, 1);
}

#[tokio::test]
async fn test_unreachable_page_aborts_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/w/cpp/symbol_index",
        symbol_index_page(&[r#"<a href="/w/cpp/container/flaky"><tt>flaky</tt></a>"#]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/w/cpp/container/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "unused.json");
    let err = run_index(&config).await.unwrap_err();

    match err {
        IndexerError::Unreachable { url, attempts, .. } => {
            assert_eq!(url, format!("{}/w/cpp/container/flaky", base_url));
            assert_eq!(attempts, 2);
        }
        other => panic!("Expected Unreachable, got: {}", other),
    }
}

#[tokio::test]
async fn test_unreachable_page_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/w/cpp/symbol_index",
        symbol_index_page(&[
            r#"<a href="/w/cpp/container/flaky"><tt>flaky</tt></a>"#,
            r#"<a href="/w/cpp/algorithm/find"><tt>find()</tt></a>"#,
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/w/cpp/container/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, "unused.json");
    config.index.on_unreachable = UnreachablePolicy::Skip;
    let run = run_index(&config).await.unwrap();

    let names: Vec<&str> = run
        .table
        .iter()
        .map(|t| t.qualified_name.as_str())
        .collect();
    assert_eq!(names, vec!["std::find", "std::flaky"]);
    assert_eq!(run.statistics.fetch.unreachable, 1);
    assert_eq!(run.statistics.fetch.retries, 1);
}
