use favorite_toggle::config::ServerConfig;
use favorite_toggle::server;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("invalid server configuration");
    if config.known_documents.is_empty() {
        tracing::warn!("FAVORITES_KNOWN_DOCUMENTS not set, accepting any document id");
    }

    let state = server::AppState::in_memory(&config.known_documents);
    let app = server::app(state, config.trace_http);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, documents = config.known_documents.len(), "favorites server listening");
    axum::serve(listener, app).await.expect("server failed");
}
