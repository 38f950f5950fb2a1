use anyhow::Result;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

use api::MIGRATOR;
use api::jwt::{JwtConfig, JwtService};
use api::mailer::{HttpMailer, MailConfig};
use api::repositories::{
    AmenityRepository, CommunityRepository, HouseRepository, PaymentRepository,
    SecurityTokenRepository, TokenConfig, UserRepository,
};
use api::routes;
use api::services::AccountService;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Hearth API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &MIGRATOR).await?;

    // Initialize session token service and mailer
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    let mail_config = MailConfig::from_env()?;
    let base_url = mail_config.base_url.clone();
    let mailer = Arc::new(HttpMailer::new(mail_config)?);

    // Initialize repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let token_repository = SecurityTokenRepository::new(pool.clone(), TokenConfig::from_env()?);
    let account_service = AccountService::new(
        user_repository.clone(),
        token_repository,
        mailer,
        jwt_service.clone(),
        base_url,
    );

    let app_state = AppState {
        db_pool: pool.clone(),
        jwt_service,
        account_service,
        user_repository,
        community_repository: CommunityRepository::new(pool.clone()),
        house_repository: HouseRepository::new(pool.clone()),
        amenity_repository: AmenityRepository::new(pool.clone()),
        payment_repository: PaymentRepository::new(pool),
    };

    info!("Hearth API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Hearth API service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
