// src/main.rs
use std::env;

use anyhow::{bail, Context};
use chrono::Utc;
use dotenvy::dotenv;
use finance_dashboard::backend;
use finance_dashboard::config::Config;
use finance_dashboard::database::db::{connection::get_db_pool, migrate::run_migrations, queries::sessions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: finance-dashboard [serve | migrate | issue-token <email> [name]]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();
    let pool = get_db_pool(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("failed to open {}", config.database_url))?;

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("serve") => {
            info!("Starting backend server...");
            backend::run_server(pool, config).await?;
        }
        Some("migrate") => {
            run_migrations(&pool).await?;
            info!("Migrations applied");
        }
        Some("issue-token") => {
            let Some(email) = args.get(1) else {
                bail!(USAGE);
            };
            let name = args.get(2).map(String::as_str).unwrap_or(email.as_str());

            run_migrations(&pool).await?;
            let now = Utc::now();
            let user_id = sessions::find_or_create_user(&pool, email, name, now).await?;
            let token = sessions::create_session(&pool, user_id, None, now).await?;

            info!(%user_id, "issued token for {email}");
            println!("{token}");
        }
        Some(other) => {
            warn!("unknown command {other}");
            bail!(USAGE);
        }
    }

    Ok(())
}
