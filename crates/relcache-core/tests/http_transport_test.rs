use std::time::Duration;

use futures_util::StreamExt;
use relcache_core::{
    paths::CacheDir, DownloadProgress, FetchError, Fetcher, HttpTransport, Notification, ReleaseTransport,
    ToolDescriptor,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn feed(server: &MockServer, body_len: usize) -> serde_json::Value {
    json!([
        {
            "tag_name": "v1.4.0",
            "assets": [{
                "name": "tool-1.4.0.zip",
                "size": body_len,
                "browser_download_url": format!("{}/download/v1.4.0/tool-1.4.0.zip", server.uri()),
            }]
        },
        {
            "tag_name": "v2.0.0",
            "assets": [{
                "name": "tool-2.0.0.zip",
                "size": 1,
                "browser_download_url": format!("{}/download/v2.0.0/tool-2.0.0.zip", server.uri()),
            }]
        },
        {
            "tag_name": "v1.3.9",
            "assets": []
        }
    ])
}

#[tokio::test]
async fn releases_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed(&server, 10)))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::with_user_agent(None)
        .unwrap()
        .feed_timeout(Duration::from_secs(5));
    let releases = transport.releases(&format!("{}/releases", server.uri())).await.unwrap();

    assert_eq!(releases.len(), 3);
    assert_eq!(releases[0].tag_name, "v1.4.0");
    assert_eq!(releases[0].assets[0].size, 10);
    assert!(releases[2].assets.is_empty());
}

#[tokio::test]
async fn malformed_feed_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "tag_name": "v1.0.0", "assets": [{ "name": "a" }] }])),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::with_user_agent(Some("relcache-tests")).unwrap();
    let err = transport.releases(&format!("{}/releases", server.uri())).await.unwrap_err();

    let error = match err {
        FetchError::Network { error, .. } => error,
        other => panic!("unexpected error: {other:?}"),
    };
    assert!(error.contains("assets[0]"), "{error}");
    assert!(error.contains("missing field"), "{error}");
}

#[tokio::test]
async fn error_status_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let transport = HttpTransport::with_user_agent(None).unwrap();
    let err = transport.releases(&format!("{}/releases", server.uri())).await.unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn download_reports_progress_test() {
    let server = MockServer::start().await;
    let body = vec![7u8; 4096];
    Mock::given(method("GET"))
        .and(path("/asset.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let transport = HttpTransport::with_user_agent(None).unwrap();
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel::<DownloadProgress>();

    let bytes = transport
        .download(&format!("{}/asset.bin", server.uri()), &sender)
        .await
        .unwrap();
    drop(sender);

    assert_eq!(bytes, body);

    let mut last = None;
    while let Some(progress) = receiver.recv().await {
        assert_eq!(progress.total, 4096);
        if let Some(DownloadProgress { downloaded, .. }) = last {
            assert!(downloaded <= progress.downloaded);
        }
        last = Some(progress);
    }
    assert_eq!(last.map(|p| p.downloaded), Some(4096));
}

#[tokio::test]
async fn fetch_and_cache_over_http_test() {
    let server = MockServer::start().await;
    let body = b"zip-bytes!".to_vec();

    Mock::given(method("GET"))
        .and(path("/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed(&server, body.len())))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/v1.4.0/tool-1.4.0.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(HttpTransport::with_user_agent(None).unwrap(), CacheDir::new(dir.path()));
    let tool = ToolDescriptor::builder()
        .name("Koala")
        .release_url(format!("{}/releases", server.uri()))
        .major_version(1)
        .build();

    let mut stream = fetcher.fetch_and_cache(tool.clone());
    let mut notifications = Vec::new();
    while let Some(item) = stream.next().await {
        notifications.push(item.unwrap());
    }

    assert_eq!(notifications[0], Notification::fetching_tool_info("Koala"));
    assert!(notifications.len() > 1);
    assert_eq!(
        std::fs::read(dir.path().join("tool-1.4.0.zip")).unwrap(),
        body
    );

    // The second call only queries the feed.
    let mut stream = fetcher.fetch_and_cache(tool);
    let mut count = 0;
    while let Some(item) = stream.next().await {
        item.unwrap();
        count += 1;
    }
    assert_eq!(count, 1);
    assert!(stream.outcome().unwrap().is_cached());
}

#[tokio::test]
async fn download_error_status_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed(&server, 10)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/v1.4.0/tool-1.4.0.zip"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(HttpTransport::with_user_agent(None).unwrap(), CacheDir::new(dir.path()));
    let tool = ToolDescriptor::builder()
        .name("Koala")
        .release_url(format!("{}/releases", server.uri()))
        .major_version(1)
        .build();

    let mut stream = fetcher.fetch_and_cache(tool);
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item);
    }

    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0].as_ref().unwrap(),
        &Notification::fetching_tool_info("Koala")
    );
    match &items[1] {
        Err(FetchError::Network { url, error }) => {
            assert!(url.ends_with("/download/v1.4.0/tool-1.4.0.zip"));
            assert!(error.contains("404"), "{error}");
        }
        other => panic!("unexpected item: {other:?}"),
    }
    assert!(stream.outcome().is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
