// src/main.rs

use builderator::errors::BuilderatorError;
use builderator::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("builderator error: {err:?}");
        if let Some(BuilderatorError::ConfigNotFound { .. }) =
            err.downcast_ref::<BuilderatorError>()
        {
            eprintln!("To generate a template run: builderator --generate");
        }
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await?;
    Ok(())
}
