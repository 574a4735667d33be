pub mod aggregate;
pub mod api;
pub mod cache;
pub mod chart;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod kpi;
pub mod normalize;
pub mod output;
pub mod record;
pub mod table;

pub async fn run_async() -> Result<(), error::CliError> {
    cli::run_async().await
}
