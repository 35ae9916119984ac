use anyhow::Context;

use invoicehub_api::app::{build_app, AppServices};
use invoicehub_api::config::AppConfig;
use invoicehub_auth::Hs256Jwt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    invoicehub_observability::init();

    let config = AppConfig::from_env()?;
    let jwt = Hs256Jwt::new(config.jwt_secret());

    let services = match &config.database_url {
        Some(url) => {
            tracing::info!("using postgres stores");
            AppServices::postgres(url, jwt)
                .await
                .context("failed to initialise postgres stores")?
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory(jwt)
        }
    };

    if config.seed_demo_data {
        services
            .seed_demo_data()
            .await
            .context("failed to seed demo data")?;
    }

    let app = build_app(services);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
