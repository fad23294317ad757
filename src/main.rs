//! Storefront server bootstrap.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags
//!   3. Load config
//!   4. Init logger once (CLI `-v` > `RUST_LOG` > config)
//!   5. Configure the payment client
//!   6. Probe the database (failure is logged, not fatal)
//!   7. Print status and exit

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
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = match cli::parse(std::env::args().skip(1)) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            println!("{}", cli::usage("storefront"));
            return Ok(());
        }
        Err(msg) => return Err(error::AppError::Config(msg)),
    };

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    let services = bootstrap::start(&config).await?;

    println!(
        "✓ storefront initialised: payment_mode={} database={}",
        services.payments.mode(),
        if services.database.is_connected() { "connected" } else { "unavailable" },
    );

    Ok(())
}
