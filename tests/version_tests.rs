use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::get};
use league_portal::{
    config::AppConfig,
    version::{FlagReloader, VersionCheck, VersionChecker},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

// --- Helper Functions ---

/// What the stub deployment serves: `Some(version)` or a 503 for `None`.
#[derive(Clone)]
struct Deployed {
    version: Arc<Mutex<Option<String>>>,
    cache_headers: Arc<Mutex<Vec<(String, String)>>>,
}

impl Deployed {
    fn set(&self, version: Option<&str>) {
        *self.version.lock().unwrap() = version.map(str::to_string);
    }
}

async fn version_handler(
    State(deployed): State<Deployed>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    deployed
        .cache_headers
        .lock()
        .unwrap()
        .push((header("cache-control"), header("pragma")));

    match deployed.version.lock().unwrap().clone() {
        Some(version) => Ok(Json(json!({ "version": version, "built_at": "2025-03-08" }))),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn spawn_deployment(initial: Option<&str>) -> (String, Deployed) {
    let deployed = Deployed {
        version: Arc::new(Mutex::new(initial.map(str::to_string))),
        cache_headers: Arc::new(Mutex::new(Vec::new())),
    };
    let router = Router::new()
        .route("/version.json", get(version_handler))
        .with_state(deployed.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}/version.json"), deployed)
}

fn checker(url: &str, reloader: &FlagReloader) -> VersionChecker {
    let config = AppConfig {
        version_url: url.to_string(),
        version_poll_interval: Duration::from_secs(1),
        request_timeout: Duration::from_secs(2),
        ..AppConfig::default()
    };
    VersionChecker::new(&config, Arc::new(reloader.clone())).expect("checker builds")
}

// --- Tests ---

#[tokio::test]
async fn test_first_poll_records_then_unchanged() {
    let (url, deployed) = spawn_deployment(Some("1.0.0")).await;
    let reloader = FlagReloader::new();
    let checker = checker(&url, &reloader);

    assert_eq!(
        checker.check_once().await,
        VersionCheck::Recorded("1.0.0".to_string())
    );
    assert_eq!(checker.check_once().await, VersionCheck::Unchanged);
    assert_eq!(checker.current_version().await.as_deref(), Some("1.0.0"));
    assert!(!reloader.take());

    // Every poll bypasses caches.
    for (cache_control, pragma) in deployed.cache_headers.lock().unwrap().iter() {
        assert_eq!(cache_control, "no-store");
        assert_eq!(pragma, "no-cache");
    }
}

#[tokio::test]
async fn test_new_version_requests_one_reload() {
    let (url, deployed) = spawn_deployment(Some("1.0.0")).await;
    let reloader = FlagReloader::new();
    let checker = checker(&url, &reloader);

    checker.check_once().await;
    deployed.set(Some("1.1.0"));

    assert_eq!(
        checker.check_once().await,
        VersionCheck::Changed {
            from: "1.0.0".to_string(),
            to: "1.1.0".to_string()
        }
    );
    assert!(reloader.take());
    // The flag is consumed by `take`.
    assert!(!reloader.take());

    // The new version is the baseline now.
    assert_eq!(checker.check_once().await, VersionCheck::Unchanged);
    assert!(!reloader.take());
}

#[tokio::test]
async fn test_failed_poll_changes_nothing() {
    let (url, deployed) = spawn_deployment(None).await;
    let reloader = FlagReloader::new();
    let checker = checker(&url, &reloader);

    assert_eq!(checker.check_once().await, VersionCheck::Failed);
    assert_eq!(checker.current_version().await, None);

    deployed.set(Some("2.0.0"));
    assert_eq!(
        checker.check_once().await,
        VersionCheck::Recorded("2.0.0".to_string())
    );

    deployed.set(None);
    assert_eq!(checker.check_once().await, VersionCheck::Failed);
    assert_eq!(checker.current_version().await.as_deref(), Some("2.0.0"));
    assert!(!reloader.take());
}

#[tokio::test]
async fn test_spawned_checker_polls_immediately() {
    let (url, _deployed) = spawn_deployment(Some("3.2.1")).await;
    let reloader = FlagReloader::new();
    let checker = checker(&url, &reloader);
    let observer = checker.clone();

    let handle = checker.spawn();
    let mut recorded = None;
    for _ in 0..50 {
        recorded = observer.current_version().await;
        if recorded.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    handle.abort();

    assert_eq!(recorded.as_deref(), Some("3.2.1"));
}
