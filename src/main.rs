use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tarsh::{Config, ShellError, ShellSession, StdConsole};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "tarsh")]
#[command(about = "A shell emulator over a virtual filesystem loaded from a tar archive")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Configuration file (INI with a [Settings] section, or .toml)
    config: PathBuf,
}

fn run(cli: &Cli) -> Result<(), ShellError> {
    let config = Config::load(&cli.config)?;
    let mut session = ShellSession::new(config, StdConsole)?;
    let stdin = std::io::stdin();
    session.run(stdin.lock())
}

fn main() -> ExitCode {
    // stdout carries only shell output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tarsh: {}", e);
            ExitCode::FAILURE
        }
    }
}
