use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use monsteralpha::cli::{run, Cli};
use monsteralpha::config::Config;

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let output = run(cli, &cfg)?;
    print!("{}", output);

    Ok(())
}
