use mealvote::{app, meals::MigrationOutcome, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "mealvote=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init()?;

    match app_state.migrate_legacy() {
        Ok(MigrationOutcome::Migrated { count }) => tracing::info!(count, "legacy meals migrated"),
        Ok(outcome) => tracing::debug!(?outcome, "no legacy migration needed"),
        Err(e) => tracing::warn!(error = %e, "legacy migration failed; continuing"),
    }

    let host = app_state.config.host.clone();
    let port = app_state.config.port;
    app::serve(app::build_app(app_state), &host, port).await
}
