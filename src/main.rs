mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;
use uuid::Uuid;

use crate::db::db::DBClient;
use crate::db::settingsdb::SettingsExt;
use service::{
    dispute_service::DisputeService,
    job_service::JobService,
    matching_service::MatchingService,
    notification_service::NotificationService,
    payment_service::PaymentService,
    wallet_service::WalletService,
};

#[derive(Debug)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    /// Singleton settings row id, resolved once at startup and reused for
    /// every read and update.
    pub settings_id: Uuid,
    // Services
    pub job_service: Arc<JobService>,
    pub matching_service: Arc<MatchingService>,
    pub payment_service: Arc<PaymentService>,
    pub wallet_service: Arc<WalletService>,
    pub dispute_service: Arc<DisputeService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config, settings_id: Uuid) -> Self {
        let db_client_arc = Arc::new(db_client);

        let notification_service = Arc::new(NotificationService::new(db_client_arc.clone()));

        let job_service = Arc::new(JobService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let matching_service = Arc::new(MatchingService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let payment_service = Arc::new(PaymentService::new(
            db_client_arc.clone(),
            notification_service.clone(),
            &config,
        ));
        let wallet_service = Arc::new(WalletService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let dispute_service = Arc::new(DisputeService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            settings_id,
            job_service,
            matching_service,
            payment_service,
            wallet_service,
            dispute_service,
            notification_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("connected to the database");
            pool
        }
        Err(err) => {
            tracing::error!("failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = if let Some(ref redis_url) = config.redis_url {
        match DBClient::with_redis(pool.clone(), redis_url).await {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("redis initialization error: {} - running without it", e);
                DBClient::new(pool)
            }
        }
    } else {
        DBClient::new(pool)
    };

    tracing::info!(
        "token revocation list: {}",
        if db_client.is_redis_available() {
            "enabled"
        } else {
            "disabled (set REDIS_URL to enable)"
        }
    );

    // Resolve the settings singleton exactly once; every later update goes
    // by this id, so a duplicate row can never race into existence.
    let settings = match db_client
        .get_or_create_settings(config.default_commission_rate)
        .await
    {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("failed to load system settings: {:?}", err);
            std::process::exit(1);
        }
    };

    let allowed_origins = vec![
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:3000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone(), settings.id));

    let app = create_router(app_state).layer(cors);

    tracing::info!("server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
