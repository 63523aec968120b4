//! Database seeder for Lyvinx.
//!
//! Seeds the system default categories (idempotent) and, when
//! `SEED_DEMO_USER` is set, an ACTIVE demo user for local testing.
//!
//! Usage: cargo run --bin seeder

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyvinx_core::{auth::hash_password, category::DEFAULT_CATEGORIES};
use lyvinx_db::{
    CategoryRepository, UserRepository, connect,
    entities::sea_orm_active_enums::UserStatus,
    repositories::CreateUserInput,
};
use lyvinx_shared::AppConfig;
use sea_orm::DatabaseConnection;

const DEMO_EMAIL: &str = "teste.ativo@example.com";
const DEMO_PASSWORD: &str = "senha123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seeder=info,lyvinx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let db = connect(&config.database).await?;
    info!("Connected to database");

    let inserted = CategoryRepository::new(db.clone())
        .seed_defaults(DEFAULT_CATEGORIES)
        .await?;
    info!(inserted, "Default categories seeded");

    if std::env::var_os("SEED_DEMO_USER").is_some() {
        seed_demo_user(db).await?;
    }

    info!("Seeding complete");
    Ok(())
}

/// Creates the demo user, or re-activates it if it already exists.
async fn seed_demo_user(db: DatabaseConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db);

    if let Some(user) = users.find_by_email(DEMO_EMAIL).await? {
        users
            .update_status(user.id.into(), UserStatus::Active)
            .await?;
        info!(email = DEMO_EMAIL, "Demo user re-activated");
        return Ok(());
    }

    users
        .create(CreateUserInput {
            name: "Usuário Teste Ativo".to_string(),
            email: DEMO_EMAIL.to_string(),
            password_hash: hash_password(DEMO_PASSWORD)?,
            cpf: None,
            status: UserStatus::Active,
        })
        .await?;
    info!(email = DEMO_EMAIL, "Demo user created");
    Ok(())
}
