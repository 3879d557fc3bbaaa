//! Integration tests for MvnKit using wiremock

use mvnkit::{
    ClientConfig, ErrorKind, FetchError, MvnClient, PacingConfig, RetryConfig, Tools,
};
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_HTML: &str = r#"<!DOCTYPE html>
<html><body><div id="maincontent">
  <div class="im">
    <div class="im-header">
      <h2 class="im-title"><a href="/artifact/com.example/foo">foo 1.2.3</a></h2>
      <p class="im-subtitle">A library</p>
      <a class="im-usage" href="/usages/com.example/foo"><b>1,234</b> usages</a>
    </div>
  </div>
  <div class="im">
    <div class="im-header">
      <h2 class="im-title"><a href="/artifact/com.example/foo-core">foo core</a></h2>
      <p class="im-subtitle"></p>
    </div>
  </div>
  <div class="im">
    <div class="im-header">
      <h2 class="im-title"><a href="/artifact/com.example/foo-extra">foo extra 0.9</a></h2>
    </div>
  </div>
</div></body></html>"#;

const VERSIONS_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<table class="grid versions">
  <thead><tr><th>Version</th><th>Date</th><th>Vulnerabilities</th></tr></thead>
  <tbody>
    <tr><td><a href="foo/2.0">2.0</a></td><td>2021-01-01</td><td>-</td></tr>
    <tr><td><a href="foo/1.0">1.0</a></td><td>2019-05-01</td><td>3 known</td></tr>
  </tbody>
</table>
</body></html>"#;

const EMPTY_VERSIONS_HTML: &str = r#"<html><body>
<table class="grid versions"><tbody></tbody></table>
</body></html>"#;

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <groupId>com.example</groupId>
  <artifactId>foo</artifactId>
  <version>1.2.3</version>
</project>
"#;

/// Config pointing both hosts at the mock server with short delays
fn test_config(server: &MockServer, spacing: Duration) -> ClientConfig {
    ClientConfig::builder()
        .base_url(server.uri())
        .repository_url(format!("{}/maven2", server.uri()))
        .pacing(PacingConfig::fixed(spacing))
        .retry(RetryConfig {
            max_retries: 3,
            backoff_step: Duration::from_millis(10),
            backoff_jitter: Duration::ZERO,
        })
        .build()
}

fn test_client(server: &MockServer) -> MvnClient {
    MvnClient::with_config(test_config(server, Duration::from_millis(10))).unwrap()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

#[tokio::test]
async fn test_search_artifacts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "foo lib"))
        .respond_with(html(SEARCH_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let outcome = client.search_artifacts("foo lib", 10).await.unwrap();

    assert_eq!(outcome.query, "foo lib");
    assert_eq!(outcome.total_results, 3);

    let first = &outcome.artifacts[0];
    assert_eq!(first.group_id, "com.example");
    assert_eq!(first.artifact_id, "foo");
    assert_eq!(first.version, "1.2.3");
    assert_eq!(first.description.as_deref(), Some("A library"));
    assert_eq!(first.usages, Some(1234));
    assert_eq!(
        first.url,
        Some(format!("{}/artifact/com.example/foo", mock_server.uri()))
    );

    let second = &outcome.artifacts[1];
    assert_eq!(second.version, "latest");
    assert_eq!(second.description, None);
    assert_eq!(second.usages, Some(0));

    assert_eq!(outcome.artifacts[2].version, "0.9");
}

#[tokio::test]
async fn test_search_respects_max_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(SEARCH_HTML))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let outcome = client.search_artifacts("foo", 2).await.unwrap();

    assert_eq!(outcome.total_results, 2);
    assert_eq!(outcome.artifacts[1].artifact_id, "foo-core");
}

#[tokio::test]
async fn test_search_degrades_on_unexpected_markup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html("<html><body><h1>Just a moment...</h1></body></html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let outcome = assert_ok!(client.search_artifacts("foo", 10).await);
    assert!(outcome.artifacts.is_empty());
    assert_eq!(outcome.total_results, 0);
}

#[tokio::test]
async fn test_artifact_versions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(html(VERSIONS_HTML))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let listing = client.artifact_versions("com.example", "foo").await.unwrap();

    assert_eq!(listing.group_id, "com.example");
    assert_eq!(listing.artifact_id, "foo");
    assert_eq!(listing.total_versions, 2);

    let newest = &listing.versions[0];
    assert_eq!(newest.version, "2.0");
    assert_eq!(newest.release_date.as_deref(), Some("2021-01-01"));
    assert_eq!(newest.vulnerabilities, None);
    assert_eq!(
        newest.url,
        Some(format!("{}/artifact/com.example/foo/2.0", mock_server.uri()))
    );

    assert_eq!(listing.versions[1].vulnerabilities, Some(3));
}

#[tokio::test]
async fn test_latest_artifact() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(html(VERSIONS_HTML))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artifact/com.example/empty"))
        .respond_with(html(EMPTY_VERSIONS_HTML))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let latest = client
        .latest_artifact("com.example", "foo")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.version, "2.0");
    assert_eq!(latest.last_updated.as_deref(), Some("2021-01-01"));
    assert_eq!(latest.group_id, "com.example");

    let none = client.latest_artifact("com.example", "empty").await.unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn test_dependency_snippets_extracted() {
    let mock_server = MockServer::start().await;

    let page = r#"<html><body>
        <div id="maven-a"><textarea>&lt;dependency&gt;from page&lt;/dependency&gt;</textarea></div>
        <div id="gradle-a"><textarea>implementation 'com.example:foo:1.2.3' // page</textarea></div>
        <div id="sbt-a"><textarea>libraryDependencies += "com.example" % "foo" % "1.2.3"</textarea></div>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo/1.2.3"))
        .respond_with(html(page))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let snippets = client
        .dependency_snippets("com.example", "foo", "1.2.3")
        .await
        .unwrap();

    assert_eq!(snippets.maven, "<dependency>from page</dependency>");
    assert_eq!(snippets.gradle, "implementation 'com.example:foo:1.2.3' // page");
    assert!(snippets.sbt.is_some());
    assert!(snippets.ivy.is_none());
}

#[tokio::test]
async fn test_dependency_snippets_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo/1.2.3"))
        .respond_with(html("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let snippets = client
        .dependency_snippets("com.example", "foo", "1.2.3")
        .await
        .unwrap();

    assert_eq!(
        snippets.maven,
        "<dependency>\n    <groupId>com.example</groupId>\n    <artifactId>foo</artifactId>\n    <version>1.2.3</version>\n</dependency>"
    );
    assert_eq!(snippets.gradle, "implementation 'com.example:foo:1.2.3'");
    assert_eq!(snippets.sbt, None);
}

#[tokio::test]
async fn test_blocked_after_three_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = assert_err!(client.artifact_versions("com.example", "foo").await);

    assert!(matches!(err, FetchError::Blocked { retries: 3 }));
    assert_eq!(err.kind(), ErrorKind::Blocked);
    assert!(err.to_string().contains("temporarily blocked"));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_blocked_retries_back_off() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .base_url(mock_server.uri())
        .pacing(PacingConfig::fixed(Duration::ZERO))
        .retry(RetryConfig {
            max_retries: 3,
            backoff_step: Duration::from_millis(100),
            backoff_jitter: Duration::ZERO,
        })
        .build();
    let client = MvnClient::with_config(config).unwrap();

    let start = Instant::now();
    let err = assert_err!(client.artifact_versions("com.example", "foo").await);

    assert!(matches!(err, FetchError::Blocked { retries: 3 }));
    // 100 + 200 + 300 ms between the four attempts
    assert!(start.elapsed() >= Duration::from_millis(600));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_recovers_after_transient_block() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(html(VERSIONS_HTML))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let listing = client.artifact_versions("com.example", "foo").await.unwrap();

    assert_eq!(listing.total_versions, 2);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.search_artifacts("foo", 10).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_referer_only_outside_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(SEARCH_HTML))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(html(VERSIONS_HTML))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.search_artifacts("foo", 10).await.unwrap();
    client.artifact_versions("com.example", "foo").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    assert_eq!(requests[0].url.path(), "/search");
    assert!(requests[0].headers.get("referer").is_none());

    assert_eq!(requests[1].url.path(), "/artifact/com.example/foo");
    assert_eq!(
        requests[1].headers.get("referer").unwrap().to_str().unwrap(),
        mock_server.uri()
    );
    assert!(requests[1].headers.get("user-agent").is_some());
}

#[tokio::test]
async fn test_back_to_back_requests_are_spaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(html(VERSIONS_HTML))
        .mount(&mock_server)
        .await;

    let spacing = Duration::from_millis(200);
    let client = MvnClient::with_config(test_config(&mock_server, spacing)).unwrap();

    let start = Instant::now();
    for _ in 0..3 {
        client.artifact_versions("com.example", "foo").await.unwrap();
    }

    // First dispatch is immediate, the next two wait for the spacing
    assert!(start.elapsed() >= spacing * 2);
}

#[tokio::test]
async fn test_concurrent_lookups_share_pacing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(html(VERSIONS_HTML))
        .mount(&mock_server)
        .await;

    let spacing = Duration::from_millis(200);
    let client = MvnClient::with_config(test_config(&mock_server, spacing)).unwrap();

    let start = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..3 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.artifact_versions("com.example", "foo").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert!(start.elapsed() >= spacing * 2);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_manifest_passthrough() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maven2/com/example/foo/1.2.3/foo-1.2.3.pom"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(POM, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let pom = client.manifest("com.example", "foo", "1.2.3").await.unwrap();

    assert_eq!(pom, POM);
}

#[tokio::test]
async fn test_manifest_is_not_paced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maven2/com/example/foo/1.2.3/foo-1.2.3.pom"))
        .respond_with(ResponseTemplate::new(200).set_body_string(POM))
        .mount(&mock_server)
        .await;

    // Pacing this long would time the test out if manifests were paced
    let client =
        MvnClient::with_config(test_config(&mock_server, Duration::from_secs(60))).unwrap();

    let lookups = async {
        for _ in 0..3 {
            client.manifest("com.example", "foo", "1.2.3").await.unwrap();
        }
    };
    assert_ok!(tokio::time::timeout(Duration::from_secs(10), lookups).await);
}

#[tokio::test]
async fn test_manifest_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maven2/com/example/missing/1.0/missing-1.0.pom"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .manifest("com.example", "missing", "1.0")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_manifest_403_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.manifest("g", "a", "1").await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 403, .. }));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .pacing(PacingConfig::fixed(Duration::ZERO))
        .build();
    let client = MvnClient::with_config(config).unwrap();

    let err = client.artifact_versions("g", "a").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_tools_render_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifact/com.example/foo"))
        .respond_with(html(VERSIONS_HTML))
        .mount(&mock_server)
        .await;

    let tools = Tools::new(test_client(&mock_server));
    let output = tools
        .call(
            "get_artifact_versions",
            serde_json::json!({"groupId": "com.example", "artifactId": "foo"}),
        )
        .await
        .unwrap();

    assert!(!output.is_error);
    assert_eq!(
        output.text,
        "Found 2 versions for com.example:foo:\n\n2.0 (2021-01-01)\n1.0 (2019-05-01) - 3 vulnerabilities"
    );
}

#[tokio::test]
async fn test_tools_report_lookup_failures_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let tools = Tools::new(test_client(&mock_server));
    let output = tools
        .call(
            "get_pom_xml",
            serde_json::json!({"groupId": "g", "artifactId": "a", "version": "1"}),
        )
        .await
        .unwrap();

    assert!(output.is_error);
    assert!(output.text.starts_with("Error fetching POM for g:a:1: "));
    assert!(output.text.contains("404"));
}
