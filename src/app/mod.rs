mod cli;
mod infra;
mod report;
mod routes;
mod server;

use obv_engine::error::AppError;

pub(crate) async fn run() -> Result<(), AppError> {
    cli::run().await
}
