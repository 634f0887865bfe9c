#![cfg(feature = "remote")]

use gitapath::store::DATASET_CACHE_KEY;
use gitapath::{AppConfig, DatasetLoader, Error, KeyValueStore, MemoryStore, VerseSource};
use tiny_http::{Response, Server};

/// Serve `responses` in order, one per request, then stop
fn serve(responses: Vec<(u16, String)>) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for (status, body) in responses {
            if let Ok(request) = server.recv() {
                let response = Response::from_string(body).with_status_code(status);
                let _ = request.respond(response);
            }
        }
    });
    format!("http://{}/verses.json", addr)
}

fn loader(url: &str) -> DatasetLoader {
    let config = AppConfig {
        dataset: VerseSource::parse(url).unwrap(),
        timeout_ms: 5000,
        ..AppConfig::default()
    };
    DatasetLoader::new(&config)
}

fn fixture() -> String {
    std::fs::read_to_string("tests/fixtures/verses.json").expect("read fixture")
}

#[tokio::test]
async fn loads_dataset_over_http_and_caches_it() {
    let url = serve(vec![(200, fixture())]);
    let store = MemoryStore::new();
    let dataset = loader(&url).load(&store).await.unwrap();
    assert_eq!(dataset.len(), 5);
    assert!(store.get(DATASET_CACHE_KEY).unwrap().is_some());
}

#[tokio::test]
async fn http_error_status_is_dataset_error() {
    let url = serve(vec![(404, "missing".into())]);
    let err = loader(&url).fetch().await.unwrap_err();
    match err {
        Error::DatasetError(msg) => assert!(msg.contains("404"), "{}", msg),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn falls_back_to_cache_when_server_fails() {
    let url = serve(vec![(200, fixture()), (500, "down".into())]);
    let store = MemoryStore::new();
    let l = loader(&url);
    let fresh = l.load(&store).await.unwrap();
    let cached = l.load(&store).await.unwrap();
    assert_eq!(fresh, cached);
    assert_eq!(fresh.fingerprint(), cached.fingerprint());
}

#[tokio::test]
async fn malformed_body_without_cache_fails() {
    let url = serve(vec![(200, "[{\"chapter\":1}]".into())]);
    let store = MemoryStore::new();
    assert!(matches!(loader(&url).load(&store).await, Err(Error::DatasetError(_))));
}
