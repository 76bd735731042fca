use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridiron::{config::Config, router, startup};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gridiron=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let bind_address = config.bind_address.clone();

    let db = startup::connect_to_database(&config).await.unwrap();
    let state = startup::build_state(config, db).unwrap();

    tracing::info!("Starting server");

    let app = router::routes().with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
