use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(companion_age_gate_migration::Migrator).await;
}
