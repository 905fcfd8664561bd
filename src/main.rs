use anyhow::Context;
use clap::Parser;
use tracing::info;

use dipcatch::cli::{check, output, Cli, Commands};

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check(args) => {
            let config = check::execute_config(&args.config)
                .with_context(|| format!("config check failed for {}", args.config.display()))?;
            config.logging.init();
            info!(pairs = config.pairs.len(), "Configuration check passed");
        }
    }
    Ok(())
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
