use mindsignal::llm::{LlmConfig, ProviderKind, ProviderRouter};
use mindsignal::{db, routes, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let llm_config = LlmConfig::from_env().expect("invalid LLM configuration");
    for kind in ProviderKind::ALL {
        let settings = llm_config.settings(kind);
        if settings.api_key.is_some() {
            tracing::info!(provider = kind.key(), model = %settings.model, "LLM provider configured");
        } else {
            tracing::warn!(provider = kind.key(), "LLM provider has no API key; disabled");
        }
    }
    let router = ProviderRouter::from_config(&llm_config).expect("LLM client init failed");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");
    let state = state::AppState::new(pool, router);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "mindsignal listening");
    axum::serve(listener, app).await.expect("server failed");
}
