//! One-shot database connectivity check.
//!
//! Reads `DATABASE_URL`, attempts a single connection and logs the result.
//! Exits 0 either way; only bad flags or config exit non-zero.

use storefront::cli::{self, Parsed};
use storefront::{bootstrap, config, error, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    let _ = dotenvy::dotenv();

    let args = match cli::parse(std::env::args().skip(1)) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            println!("{}", cli::usage("db-probe"));
            return Ok(());
        }
        Err(msg) => return Err(error::AppError::Config(msg)),
    };

    let config = config::load(args.config_path.as_deref())?;

    logger::init(
        args.log_level.unwrap_or(config.log_level.as_str()),
        args.log_level.is_some(),
    )?;

    bootstrap::run_probe(&config.database).await;
    Ok(())
}
