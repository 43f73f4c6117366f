use axum::http::{header, HeaderValue, Method};
use club_hub::{config::Config, db, seed, AppState};
use envconfig::Envconfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::init_from_env()?;
    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is unset, using the development default");
    }

    let db_url = config.database_url()?;
    db::run_migrations(&db_url).await?;
    let pool = db::connect_to_db(&db_url, config.db_pool_size)?;

    {
        let conn = &mut pool.get().await?;
        seed::run(conn, chrono::Local::now().date_naive()).await?;
    }

    let origins = config
        .cors_origins()
        .into_iter()
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(origins)
        .allow_credentials(true);

    let app = club_hub::app(AppState::new(pool))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
