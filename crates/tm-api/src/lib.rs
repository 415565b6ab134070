use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::header::{HeaderName, HeaderValue, CONTENT_TYPE},
    http::{Method, Request},
    routing::{get, post},
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use tm_common::context::{ContextPaths, EngineContext};
use tm_common::embedding::load_embedder_from_env;
use tm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use tm_common::matching::{RankingConfig, RankingEngine};

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{candidates, health, jobs, matches, prospects, stats};

const SHUTDOWN_DRAIN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Parser)]
#[command(name = "tm-api", about = "HTTP API for the Talent Match GUI")]
struct Cli {
    /// Directory holding the record collections (vagas, candidatos, prospects)
    #[arg(long, env = "TM_DATA_DIR", default_value = "data")]
    data_dir: String,

    /// Directory holding the vector index files
    #[arg(long, env = "TM_INDEX_DIR", default_value = "models")]
    index_dir: String,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "TM_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: String,
    pub index_dir: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Self {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        Self {
            data_dir: cli.data_dir,
            index_dir: cli.index_dir,
            port: cli.port,
            cors_origins,
        }
    }
}

pub struct AppState {
    pub ctx: EngineContext,
    pub engine: RankingEngine,
    pub readiness: AtomicBool,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn create_router(state: SharedState, cors_origins: &[String]) -> Router {
    let cors = cors_layer(cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<axum::body::Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new()
        .route("/jobs", post(jobs::create_job))
        .route("/jobs/:id", get(jobs::get_job))
        .route("/jobs/:id/matches", get(matches::list_matches))
        .route("/jobs/:id/matches/export", get(matches::export_matches))
        .route("/candidates", post(candidates::create_candidate))
        .route("/candidates/:id", get(candidates::get_candidate))
        .route("/candidates/:id/export", get(candidates::export_candidate))
        .route("/prospects", post(prospects::create_prospect))
        .route("/stats", get(stats::get_stats));

    Router::new()
        .route("/health", get(health::readyz))
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

/// State wired to temp-style directories; used by the router tests.
pub fn state_for_dirs(data_dir: &str, index_dir: &str) -> Result<SharedState, ApiError> {
    let paths = ContextPaths::new(data_dir, index_dir);
    let (config, embedder) = load_embedder_from_env();
    let ctx = EngineContext::open(&paths, &config, embedder)?;

    Ok(Arc::new(AppState {
        ctx,
        engine: RankingEngine::new(RankingConfig::from_env()),
        readiness: AtomicBool::new(true),
    }))
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber("tm-api");
    install_tracing_panic_hook("tm-api");

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli);

    let state = state_for_dirs(&config.data_dir, &config.index_dir)?;
    let stats = state.ctx.stats();
    info!(
        jobs = stats.jobs,
        candidates = stats.candidates,
        prospects = stats.prospects,
        "record collections loaded"
    );

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone(), &config.cors_origins);

    info!(%addr, "tm-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.readiness.store(false, Ordering::SeqCst);

    // Give load balancers a brief window to observe /readyz as not ready
    // before axum stops accepting new connections.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}
