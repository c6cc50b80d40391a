mod audit;
mod bridge;
mod cli;
mod commands;
mod error;
mod output;
mod server;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Completions don't need configuration
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "airscope", &mut std::io::stdout());
            Ok(())
        }

        Command::Scan => {
            let config = load_config(&cli.global)?;
            commands::scan::handle(&cli.global, config).await
        }

        Command::Serve(args) => {
            let config = load_config(&cli.global)?;
            commands::serve::handle(args, &cli.global, config).await
        }

        Command::Sniff(args) => {
            let config = load_config(&cli.global)?;
            commands::sniff::handle(args, &cli.global, config).await
        }
    }
}

fn load_config(global: &cli::GlobalOpts) -> Result<airscope_config::Config, CliError> {
    airscope_config::load_config(global.config.as_deref()).map_err(CliError::from)
}
