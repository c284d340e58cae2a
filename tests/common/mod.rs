#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use mixology::SearchClient;
use mixology::config::SearchConfig;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;
use url::Url;

pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "mixology-{prefix}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.to_str().unwrap())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let wal = PathBuf::from(format!("{}-wal", self.path.to_string_lossy()));
        let shm = PathBuf::from(format!("{}-shm", self.path.to_string_lossy()));
        let _ = std::fs::remove_file(&wal);
        let _ = std::fs::remove_file(&shm);
        let _ = std::fs::remove_file(&self.path);
    }
}

/// What the fake catalog answers with.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    /// Full listing served by `list.php`.
    pub catalog: Vec<String>,
    /// Canned `search.php` answers keyed by the `s` parameter; missing keys answer `null`.
    pub searches: HashMap<String, Vec<String>>,
    /// Number of `list.php` calls to fail with 503 before answering.
    pub list_failures: usize,
    /// Serve this raw body for every request instead of JSON.
    pub garbage_body: Option<String>,
}

#[derive(Clone)]
pub struct FakeState {
    pub catalog: Arc<Mutex<FakeCatalog>>,
    pub list_calls: Arc<AtomicUsize>,
    pub search_queries: Arc<Mutex<Vec<String>>>,
}

fn envelope(names: &[String]) -> Value {
    json!({ "drinks": names.iter().map(|n| json!({ "strDrink": n, "idDrink": "0" })).collect::<Vec<_>>() })
}

async fn search_handler(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let query = params.get("s").cloned().unwrap_or_default();
    state.search_queries.lock().unwrap().push(query.clone());

    let catalog = state.catalog.lock().unwrap().clone();
    if let Some(body) = catalog.garbage_body {
        return Err((StatusCode::OK, body));
    }
    match catalog.searches.get(&query) {
        Some(names) => Ok((StatusCode::OK, Json(envelope(names)))),
        None => Ok((StatusCode::OK, Json(json!({ "drinks": null })))),
    }
}

async fn list_handler(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let call = state.list_calls.fetch_add(1, Ordering::SeqCst);
    let catalog = state.catalog.lock().unwrap().clone();

    if params.get("c").map(String::as_str) != Some("list") {
        return Err((StatusCode::BAD_REQUEST, "missing c=list".to_string()));
    }
    if call < catalog.list_failures {
        return Err((StatusCode::SERVICE_UNAVAILABLE, "try later".to_string()));
    }
    if let Some(body) = catalog.garbage_body {
        return Err((StatusCode::OK, body));
    }
    Ok((StatusCode::OK, Json(envelope(&catalog.catalog))))
}

pub struct FakeServer {
    pub base_url: Url,
    pub state: FakeState,
}

impl FakeServer {
    pub fn config(&self) -> SearchConfig {
        SearchConfig {
            timeout_secs: 5,
            ..SearchConfig::default()
        }
        .with_base_url(self.base_url.clone())
    }

    /// Client aimed at this server, ignoring any proxy configured in the environment.
    pub fn client(&self) -> SearchClient {
        local_client(&self.config())
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.state.search_queries.lock().unwrap().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeCatalog)) {
        f(&mut self.state.catalog.lock().unwrap());
    }
}

pub async fn spawn_fake_catalog(catalog: FakeCatalog) -> FakeServer {
    let state = FakeState {
        catalog: Arc::new(Mutex::new(catalog)),
        list_calls: Arc::new(AtomicUsize::new(0)),
        search_queries: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/json/v1/1/search.php", get(search_handler))
        .route("/api/json/v1/1/list.php", get(list_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base_url =
        Url::parse(&format!("http://{}/api/json/v1/1/", addr)).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    FakeServer { base_url, state }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn local_client(cfg: &SearchConfig) -> SearchClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build reqwest client");
    SearchClient::with_client(cfg, http).expect("valid search config")
}
