mod cli;
mod infra;
mod page;
mod predict;
mod routes;
mod server;

use loan_approval::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
