//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` and applies or rolls back the blog schema:
//! `cargo run -p migration -- up`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    cli::run_cli(migration::Migrator).await;
}
