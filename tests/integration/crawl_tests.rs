//! Integration tests for the archiver
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! archive cycles end-to-end into temporary directories.

use encoding_rs::{EUC_JP, SHIFT_JIS};
use site_archiver::config::{parse_config, Config};
use site_archiver::crawler::run_archive;
use site_archiver::mirror::scan_mirror;
use site_archiver::ArchiveError;
use std::collections::BTreeSet;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOP_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Home</title></head><body>
<div class="widget"><h3>人気記事ランキング</h3><ul><li>ranked</li></ul></div>
<ul><li id="view_sp">mobile</li></ul>
<div id="bodyGrid">
<a href="/a">A</a>
<a href="/a/#comments">A again</a>
<a href="/p?x=1#frag">P with query</a>
<a href="/tagcloud?tag=news">News</a>
<a href="https://other.com/x">Elsewhere</a>
<a href="mailto:owner@example.com">Mail</a>
<img src="/img/logo.png">
</div>
</body></html>"#;

const LOGO: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

/// Creates a test configuration rooted in `dir` for the mock server at `base_url`
fn create_test_config(dir: &Path, base_url: &str, extra: &str) -> Config {
    parse_config(&format!(
        r#"
[site]
top-page-url = "{}"
sitemap-url-path = "/sitemap.xml"

[output]
mirror-root = "{}"
state-dir = "{}"
file-prefix = "site"

[fetch]
retry-count = 3
retry-backoff-ms = 0
{}
"#,
        base_url,
        dir.join("mirror").display(),
        dir.display(),
        extra
    ))
    .expect("Failed to parse test config")
}

fn sitemap_xml(entries: &[(String, Option<&str>)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.google.com/schemas/sitemap/0.84">"#,
    );
    for (loc, lastmod) in entries {
        xml.push_str("<url><loc>");
        xml.push_str(loc);
        xml.push_str("</loc>");
        if let Some(lastmod) = lastmod {
            xml.push_str("<lastmod>");
            xml.push_str(lastmod);
            xml.push_str("</lastmod>");
        }
        xml.push_str("</url>");
    }
    xml.push_str("</urlset>");
    xml
}

async fn mount_sitemap(server: &MockServer, entries: &[(String, Option<&str>)]) {
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sitemap_xml(entries), "application/xml"))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.as_ref().display(), e))
}

fn lines(path: impl AsRef<Path>) -> Vec<String> {
    read(path).lines().map(str::to_string).collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_sitemap(
        &mock_server,
        &[
            (format!("{}/", base_url), Some("2024-05-01T10:00:00+09:00")),
            (format!("{}/about", base_url), None),
        ],
    )
    .await;
    mount_page(&mock_server, "/", TOP_PAGE).await;
    mount_page(&mock_server, "/a", r#"<html><body><a href="/">Home</a></body></html>"#).await;
    mount_page(&mock_server, "/p", "<html><body>P</body></html>").await;
    mount_page(&mock_server, "/about", r#"<html><body><a href="/hidden">Hidden</a></body></html>"#).await;

    Mock::given(method("GET"))
        .and(path("/tagcloud"))
        .and(query_param("tag", "news"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><a href="/tagcloud?tag=news">self</a></body></html>"#,
            "text/html",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LOGO.to_vec(), "image/png"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Only reachable from a sitemap entry, which is never followed
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");

    assert!(report.is_complete());
    assert_eq!(report.exit_code(), 0);

    let mirror = dir.path().join("mirror");

    // Top page rewritten and saved with its sidecar
    let index = read(mirror.join("index.html"));
    assert!(index.contains("<div id=\"headerBanner\">"));
    assert!(!index.contains("人気記事ランキング"));
    assert!(!index.contains("view_sp"));
    assert!(index.contains("href=\"/tagcloud/news\""));
    assert!(read(mirror.join("index.html.metadata")).starts_with("Content-Type: text/html"));

    // Pages, tag page and the asset
    assert!(mirror.join("a").join("index.html").exists());
    assert!(mirror.join("p").join("index.html").exists());
    assert!(mirror.join("about").join("index.html").exists());
    assert!(mirror.join("tagcloud").join("news").join("index.html").exists());
    assert!(!mirror.join("hidden").exists());
    assert_eq!(std::fs::read(mirror.join("img").join("logo.png")).unwrap(), LOGO);
    assert_eq!(
        read(mirror.join("img").join("logo.png.metadata")),
        "Content-Type: image/png\n"
    );

    // Processed log: sorted, includes the regenerated feed
    let expected: BTreeSet<String> = [
        base_url.clone(),
        format!("{}/a", base_url),
        format!("{}/about", base_url),
        format!("{}/img/logo.png", base_url),
        format!("{}/p", base_url),
        format!("{}/sitemap.xml", base_url),
        format!("{}/tagcloud?tag=news", base_url),
    ]
    .into();
    assert_eq!(
        lines(dir.path().join("site_processed_log.txt")),
        expected.into_iter().collect::<Vec<_>>()
    );

    // Query duplicate recorded, off-site link never recorded anywhere
    assert_eq!(
        lines(dir.path().join("site_skipped_log.txt")),
        vec![format!("{}/p?x=1", base_url)]
    );
    for log in ["site_processed_log.txt", "site_skipped_log.txt"] {
        assert!(!read(dir.path().join(log)).contains("other.com"));
    }

    // Nothing failed, so no retry file
    assert!(!dir.path().join("site_download_retry.txt").exists());

    // Output sitemap
    let sitemap = read(mirror.join("sitemap.xml"));
    assert!(sitemap.starts_with("<urlset xmlns=\"http://www.google.com/schemas/sitemap/0.84\">"));
    assert!(sitemap.contains(&format!("<loc>{}</loc>\n    <lastmod>2024-05-01T10:00:00+0900</lastmod>\n    <changefreq>never</changefreq>\n    <priority>0.8</priority>", base_url)));
    assert!(sitemap.contains(&format!("<loc>{}/tagcloud/news</loc>", base_url)));
    assert!(!sitemap.contains("?tag="));
    assert_eq!(
        read(mirror.join("sitemap.xml.metadata")),
        "Content-Type: application/xml\n"
    );
}

#[tokio::test]
async fn test_redirected_page_is_skipped_not_saved() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/old">Old</a><a href="/new">New</a></body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/new", "<html><body>new</body></html>").await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");

    assert!(report.is_complete());
    assert!(!dir.path().join("mirror").join("old").exists());

    let skipped = lines(dir.path().join("site_skipped_log.txt"));
    assert_eq!(skipped, vec![format!("{}/old", base_url)]);

    let processed = lines(dir.path().join("site_processed_log.txt"));
    assert!(!processed.contains(&format!("{}/old", base_url)));
    assert!(processed.contains(&format!("{}/new", base_url)));
}

#[tokio::test]
async fn test_unreadable_sitemap_aborts_before_any_fetch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let result = run_archive(config).await;

    assert!(matches!(result, Err(ArchiveError::Sitemap(_))));
    assert!(!dir.path().join("mirror").exists());
    assert!(!dir.path().join("site_download_retry.txt").exists());
}

#[tokio::test]
async fn test_failures_written_to_retry_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;
    mount_page(&mock_server, "/", r#"<html><body><a href="/broken">B</a></body></html>"#).await;

    // Three attempts, then it goes to the retry file
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");

    assert!(!report.is_complete());
    assert_eq!(report.exit_code(), 2);
    assert_eq!(report.failed, vec![format!("{}/broken", base_url)]);
    assert!(report.summary_line().contains("site_download_retry.txt"));

    assert_eq!(
        read(dir.path().join("site_download_retry.txt")),
        format!("{}/broken\n", base_url)
    );
    assert!(!dir.path().join("mirror").join("broken").exists());
}

#[tokio::test]
async fn test_retry_mode_converges_and_clears_ledger() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();
    let retry_file = dir.path().join("site_download_retry.txt");

    std::fs::write(
        &retry_file,
        format!("{}/a\n{}/b\n", base_url, base_url),
    )
    .unwrap();

    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;

    // The top page is not in the ledger, so it is never requested
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    // A fails once, then succeeds
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/a", "<html><body>a</body></html>").await;

    // B always fails
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Retry run failed");

    assert!(report.retry_mode);
    assert_eq!(report.failed, vec![format!("{}/b", base_url)]);
    assert_eq!(read(&retry_file), format!("{}/b\n", base_url));
    assert!(dir.path().join("mirror").join("a").join("index.html").exists());
    assert!(!dir.path().join("mirror").join("index.html").exists());

    // The gated top page still appears in the published feed
    let sitemap = read(dir.path().join("mirror").join("sitemap.xml"));
    assert!(sitemap.contains(&format!("<loc>{}</loc>", base_url)));
    assert!(sitemap.contains(&format!("<loc>{}/a</loc>", base_url)));

    // Second retry run: B recovers and the ledger file disappears
    mock_server.verify().await;
    mock_server.reset().await;
    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;
    mount_page(&mock_server, "/b", "<html><body>b</body></html>").await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Second retry run failed");

    assert!(report.is_complete());
    assert_eq!(report.exit_code(), 0);
    assert!(!retry_file.exists());
    assert!(dir.path().join("mirror").join("b").join("index.html").exists());
}

#[tokio::test]
async fn test_sitemap_pass_does_not_extend_worklist() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_sitemap(
        &mock_server,
        &[
            (base_url.clone(), None),
            (format!("{}/orphan", base_url), None),
            ("https://other.com/outside".to_string(), None),
        ],
    )
    .await;
    mount_page(&mock_server, "/", "<html><body>no links</body></html>").await;
    mount_page(
        &mock_server,
        "/orphan",
        r#"<html><body><a href="/deeper">Deeper</a><img src="/deeper.png"></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/deeper"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/deeper.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");

    assert_eq!(report.processed, 2);
    let processed = lines(dir.path().join("site_processed_log.txt"));
    assert!(processed.contains(&format!("{}/orphan", base_url)));
    assert!(!processed.iter().any(|url| url.contains("deeper")));
    assert!(!processed.iter().any(|url| url.contains("other.com")));
    assert!(!dir.path().join("site_skipped_log.txt").exists());
}

#[tokio::test]
async fn test_concurrent_fetches_dispatch_each_url_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    let mut top = String::from("<html><body>");
    for i in 0..12 {
        top.push_str(&format!(r#"<a href="/page{}">p</a>"#, i));
    }
    top.push_str("</body></html>");

    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;
    mount_page(&mock_server, "/", &top).await;

    for i in 0..12 {
        // Every page links to its neighbours, so keys are rediscovered while in flight
        let body = format!(
            r#"<html><body><a href="/page{}">n</a><a href="/page{}">n</a><a href="/">home</a></body></html>"#,
            (i + 1) % 12,
            (i + 11) % 12
        );
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(dir.path(), &base_url, "max-concurrent-fetches = 4");
    let report = run_archive(config).await.expect("Archive run failed");

    assert!(report.is_complete());
    assert_eq!(report.processed, 13);
}

#[tokio::test]
async fn test_rerun_reproduces_identical_mirror() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_sitemap(
        &mock_server,
        &[
            (base_url.clone(), Some("2024-05-01T10:00:00+09:00")),
            (format!("{}/a", base_url), Some("2024-04-01T08:30:00+09:00")),
            (format!("{}/img/logo.png", base_url), Some("2024-03-01T00:00:00+00:00")),
            (format!("{}/tagcloud?tag=news", base_url), Some("2024-02-01T00:00:00+00:00")),
            (format!("{}/p", base_url), Some("2024-01-01T00:00:00+00:00")),
        ],
    )
    .await;
    mount_page(&mock_server, "/", TOP_PAGE).await;
    mount_page(&mock_server, "/a", "<html><body>a</body></html>").await;
    mount_page(&mock_server, "/p", "<html><body>p</body></html>").await;
    mount_page(&mock_server, "/tagcloud", "<html><body>tags</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LOGO.to_vec(), "image/png"))
        .mount(&mock_server)
        .await;

    let snapshot = |root: &Path| {
        scan_mirror(root)
            .expect("Failed to scan mirror")
            .objects
            .into_iter()
            .map(|object| {
                let bytes = std::fs::read(&object.path).unwrap();
                (object.key, bytes, object.content_type)
            })
            .collect::<Vec<_>>()
    };

    let mirror = dir.path().join("mirror");

    let first = run_archive(create_test_config(dir.path(), &base_url, ""))
        .await
        .expect("First run failed");
    assert!(first.is_complete());
    let before = snapshot(&mirror);

    let second = run_archive(create_test_config(dir.path(), &base_url, ""))
        .await
        .expect("Second run failed");
    assert!(second.is_complete());
    let after = snapshot(&mirror);

    assert_eq!(before.len(), 6);
    assert!(before.iter().all(|(_, _, content_type)| content_type.is_some()));
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_pages_keep_their_declared_encoding() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;

    // Charset declared in the response header
    let (top, _, _) = SHIFT_JIS.encode(
        r#"<html><head></head><body><div id="bodyGrid"><p>日本語</p><a href="/euc">EUC</a></div></body></html>"#,
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=Shift_JIS")
                .set_body_bytes(top.into_owned()),
        )
        .mount(&mock_server)
        .await;

    // Charset declared only inside the document
    let (euc, _, _) = EUC_JP.encode(
        r#"<html><head><meta charset="EUC-JP"></head><body><p>アーカイブ</p></body></html>"#,
    );
    Mock::given(method("GET"))
        .and(path("/euc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_bytes(euc.into_owned()),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");
    assert!(report.is_complete());

    let mirror = dir.path().join("mirror");

    let saved = std::fs::read(mirror.join("index.html")).unwrap();
    let (text, _, had_errors) = SHIFT_JIS.decode(&saved);
    assert!(!had_errors);
    assert!(text.contains("<p>日本語</p>"));
    assert!(text.contains("本ページはアーカイブです。"));
    assert!(!text.contains('\u{fffd}'));
    assert_eq!(
        read(mirror.join("index.html.metadata")),
        "Content-Type: text/html; charset=Shift_JIS\n"
    );

    let saved = std::fs::read(mirror.join("euc").join("index.html")).unwrap();
    let (text, _, had_errors) = EUC_JP.decode(&saved);
    assert!(!had_errors);
    assert!(text.contains("<p>アーカイブ</p>"));
    assert!(text.contains("charset=\"EUC-JP\""));
}

#[tokio::test]
async fn test_non_html_response_saved_unmodified() {
    const FEED: &str = r#"<?xml version="1.0"?><rss version="2.0"><channel><link>https://ex.com/</link><description><a href="/unfollowed">x</a></description></channel></rss>"#;

    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;
    mount_page(&mock_server, "/", r#"<html><body><a href="/feed">Feed</a></body></html>"#).await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/rss+xml")
                .set_body_bytes(FEED.as_bytes().to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Only linked from inside the feed, which is never parsed
    Mock::given(method("GET"))
        .and(path("/unfollowed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");
    assert!(report.is_complete());

    let mirror = dir.path().join("mirror");
    assert_eq!(
        std::fs::read(mirror.join("feed").join("index.html")).unwrap(),
        FEED.as_bytes()
    );
    assert_eq!(
        read(mirror.join("feed").join("index.html.metadata")),
        "Content-Type: application/rss+xml\n"
    );
    assert!(lines(dir.path().join("site_processed_log.txt")).contains(&format!("{}/feed", base_url)));
}

#[tokio::test]
async fn test_redirected_sitemap_feed_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();

    let moved = format!("{}/sitemap2.xml", base_url);
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", moved.as_str()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap2.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sitemap_xml(&[(base_url.clone(), None), (format!("{}/about", base_url), None)]),
            "application/xml",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", "<html><body>home</body></html>").await;
    mount_page(&mock_server, "/about", "<html><body>about</body></html>").await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");

    assert!(report.is_complete());
    assert_eq!(report.sitemap_entries, 2);
    assert!(dir.path().join("mirror").join("about").join("index.html").exists());
}

#[tokio::test]
async fn test_foreign_retry_entries_are_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();
    let retry_file = dir.path().join("site_download_retry.txt");

    // Shares the site's textual prefix but names another host
    let foreign = format!("{}@evil.example/x", base_url);
    std::fs::write(&retry_file, format!("{}/b\n{}\n", base_url, foreign)).unwrap();

    mount_sitemap(&mock_server, &[(base_url.clone(), None)]).await;
    mount_page(&mock_server, "/b", "<html><body>b</body></html>").await;

    let config = create_test_config(dir.path(), &base_url, "");
    let report = run_archive(config).await.expect("Archive run failed");

    assert!(report.is_complete());
    assert!(report.failed.is_empty());
    assert!(!retry_file.exists());
    assert!(dir.path().join("mirror").join("b").join("index.html").exists());
    for log in ["site_processed_log.txt", "site_skipped_log.txt"] {
        let path = dir.path().join(log);
        if path.exists() {
            assert!(!read(path).contains("evil.example"));
        }
    }
}
