use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use novel_spider::core::config::AppConfig;
use novel_spider::core::record::{load_record, save_record};
use novel_spider::interfaces::PageFetcher;
use novel_spider::network::HttpFetcher;
use novel_spider::{ErrorKind, NovelEngine, Result};

const WORK: &str = "https://kakuyomu.jp/works/1234567";

const STATE: &str = r#"{
    "Work:1234567": {
        "__typename": "Work",
        "title": "Bar",
        "author": {"__ref": "UserAccount:42"},
        "tableOfContents": [
            {"__ref": "TableOfContentsChapter:100"},
            {"__ref": "TableOfContentsChapter:200"}
        ]
    },
    "UserAccount:42": {"__typename": "UserAccount", "activityName": "Baz"},
    "TableOfContentsChapter:100": {"__typename": "TableOfContentsChapter", "chapter": {"__ref": "Chapter:100"}, "episodeUnions": [{"__ref": "Episode:11"}]},
    "TableOfContentsChapter:200": {"__typename": "TableOfContentsChapter", "chapter": {"__ref": "Chapter:200"}, "episodeUnions": [{"__ref": "Episode:22"}]},
    "Chapter:100": {"__typename": "Chapter", "title": "First", "level": 1},
    "Chapter:200": {"__typename": "Chapter", "title": "Second", "level": 1},
    "Episode:11": {"__typename": "Episode", "id": "11", "title": "e1", "publishedAt": "2023-01-02T03:04:05Z"},
    "Episode:22": {"__typename": "Episode", "id": "22", "title": "e2", "publishedAt": "2023-02-03T04:05:06Z"}
}"#;

fn index_page() -> String {
    format!(
        r#"<html><head><script id="__NEXT_DATA__" type="application/json">{{"props":{{"pageProps":{{"__APOLLO_STATE__":{}}}}}}}</script></head><body></body></html>"#,
        STATE
    )
}

fn episode_page(text: &str) -> String {
    format!(
        "<html><body><div class=\"widget-episodeBody js-episode-body\" data-viewer-history-path=\"/x\">\n<p id=\"p1\">{}<em class=\"emphasisDots\"><span>傍</span></em></p>\n</div></body></html>",
        text
    )
}

/// 在本地回放站点页面的 HTTP 服务
fn spawn_site(routes: HashMap<String, (u16, String)>) -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };
            let response = match routes.get(request.url()) {
                Some((status, body)) => {
                    tiny_http::Response::from_string(body.clone()).with_status_code(*status)
                }
                None => tiny_http::Response::from_string("not found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    (base_url, shutdown_tx, handle)
}

/// 把站点地址改写到本地服务后交给真实的 HTTP 获取器
struct Mirror {
    origin: &'static str,
    base_url: String,
    inner: HttpFetcher,
}

#[async_trait]
impl PageFetcher for Mirror {
    async fn fetch(&self, url: &str) -> Result<String> {
        let local = url.replacen(self.origin, &self.base_url, 1);
        self.inner.fetch(&local).await
    }
}

fn routes(second_status: u16) -> HashMap<String, (u16, String)> {
    HashMap::from([
        ("/works/1234567".to_string(), (200, index_page())),
        ("/works/1234567/episodes/11".to_string(), (200, episode_page("one"))),
        ("/works/1234567/episodes/22".to_string(), (second_status, episode_page("two"))),
    ])
}

fn mirror(base_url: String) -> Arc<Mirror> {
    Arc::new(Mirror {
        origin: "https://kakuyomu.jp",
        base_url,
        inner: HttpFetcher::new(&AppConfig::default()).unwrap(),
    })
}

#[tokio::test]
async fn record_and_chapters_are_written() {
    let (base_url, shutdown, handle) = spawn_site(routes(200));
    let engine = NovelEngine::new(mirror(base_url));

    let extraction = engine.build_record(WORK).await.unwrap();
    let novel = &extraction.novel;
    assert_eq!(novel.title, "Bar");
    assert_eq!(novel.author, "Baz");
    assert_eq!(novel.link, WORK);
    assert_eq!(novel.sections.len(), 2);

    let tmp = tempfile::tempdir().unwrap();
    let record_path = tmp.path().join("Bar.json");
    save_record(novel, &record_path).await.unwrap();
    assert_eq!(&load_record(&record_path).await.unwrap(), novel);

    let record_text = std::fs::read_to_string(&record_path).unwrap();
    assert!(record_text.contains("\n    \"title\": \"Bar\""));
    assert!(record_text.contains("\"date_posted\": \"2023-01-02T03:04:05Z\""));
    assert!(!record_text.contains("date_updated"));

    let dir = tmp.path().join("Bar");
    engine
        .download_chapters(novel, extraction.site.as_ref(), &dir)
        .await
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(dir.join("e1.html")).unwrap(),
        "<p>one<em class=\"em-dot\"><span>傍</span></em></p>"
    );
    assert!(dir.join("e2.html").exists());

    let _ = shutdown.send(());
    let _ = handle.join();
}

#[tokio::test]
async fn server_error_aborts_download() {
    let (base_url, shutdown, handle) = spawn_site(routes(503));
    let engine = NovelEngine::new(mirror(base_url));
    let extraction = engine.build_record(WORK).await.unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let err = engine
        .download_chapters(&extraction.novel, extraction.site.as_ref(), tmp.path())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert!(tmp.path().join("e1.html").exists());
    assert!(!tmp.path().join("e2.html").exists());

    let _ = shutdown.send(());
    let _ = handle.join();
}

#[tokio::test]
async fn unsupported_host_never_reaches_network() {
    let (base_url, shutdown, handle) = spawn_site(HashMap::new());
    let engine = NovelEngine::new(mirror(base_url));

    let err = engine
        .build_record("https://example.com/works/1")
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::UnsupportedHost);

    let _ = shutdown.send(());
    let _ = handle.join();
}
