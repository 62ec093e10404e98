use axum::{
    Router,
    routing::{get, post},
};
use common::{retry_with_backoff, setup_logging};
use detector::backend::ort::OrtBackend;
use detector::config::load_descriptor;
use detector::fetch::{ModelSource, fetch_model};
use detector::Predictor;
use gateway::{config::get_configuration, handler, state::AppState};
use tower_http::trace::TraceLayer;

const FETCH_ATTEMPTS: u32 = 3;
const FETCH_BASE_DELAY_MS: u64 = 500;

fn main() -> anyhow::Result<()> {
    let settings = get_configuration()?;
    setup_logging(settings.log_level.clone(), settings.environment.clone());

    tracing::info!(
        environment = settings.environment.as_str(),
        "Configuration loaded"
    );

    // Cold start: everything below must succeed or the instance is
    // unusable and exits non-zero.
    let detector_config = load_descriptor(&settings.detector_config)?;
    tracing::info!(config = ?detector_config, "Loaded detector descriptor");

    let person_class_id = detector_config.class_id("person").ok_or_else(|| {
        anyhow::anyhow!(
            "class list in {} has no `person` entry",
            settings.detector_config
        )
    })?;

    let source = ModelSource::from_env()?;
    let model_bytes = retry_with_backoff(
        || fetch_model(&source),
        FETCH_ATTEMPTS,
        FETCH_BASE_DELAY_MS,
        "Model fetch",
    )?;
    let backend = OrtBackend::load_from_bytes(&model_bytes)?;
    let predictor = Predictor::new(backend, detector_config);
    tracing::info!(person_class_id, "Detector ready");

    let state = AppState::new(predictor, person_class_id);
    let addr = settings.listen_addr();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(state, &addr))
}

async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/invocations", post(handler::invoke))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Endpoint listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}
