mod app;
mod auth;
mod config;
mod seed;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "gymadmin=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;

    // `gymadmin seed` provisions the first admin account and exits.
    if std::env::args().nth(1).as_deref() == Some("seed") {
        seed::seed_admin(state.auth.store().as_ref()).await?;
        return Ok(());
    }

    let app = app::build_app(state);
    app::serve(app).await
}
