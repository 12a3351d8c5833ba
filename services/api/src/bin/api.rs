//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        FileStore, OpenAiInstructionAdapter, OpenAiSuggestionAdapter, SimulatedPaymentProvider,
    },
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use recipe_curator_core::{Curator, SessionManager, SystemClock};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Restore the Persisted Session ---
    let store = Arc::new(FileStore::open(&config.data_dir)?);
    info!("Loading session from {}", store.dir().display());
    let session = SessionManager::load(store, Arc::new(SystemClock));
    info!(
        "Session restored: user={:?}, {} recipes in catalog",
        session.user().map(|u| u.name.as_str()),
        session.catalog().len()
    );

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(config.require_openai_api_key()?);
    let openai_client = Client::with_config(openai_config);

    let suggestion_adapter = Arc::new(OpenAiSuggestionAdapter::new(
        openai_client.clone(),
        config.suggestion_model.clone(),
    ));
    let instruction_adapter = Arc::new(OpenAiInstructionAdapter::new(
        openai_client.clone(),
        config.instruction_model.clone(),
    ));
    let payment_provider = Arc::new(SimulatedPaymentProvider::new(config.payment_delay));

    // --- 4. Build the Shared AppState ---
    let curator = Curator::new(session, suggestion_adapter, instruction_adapter, payment_provider);
    let app_state = AppState::new(curator);

    let ui_origin = config.ui_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid UI origin '{}': {}", config.ui_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(ui_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
