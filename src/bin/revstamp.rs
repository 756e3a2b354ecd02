use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
};

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use revstamp::stamp;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("REVSTAMP_BUILD_REV"),
    ")"
);

#[derive(Debug, Parser)]
#[command(
    name = "revstamp",
    version,
    long_version = LONG_VERSION,
    about = "Write the working-copy revision into version.h"
)]
struct Cli {
    /// Directory holding version.template and version.h (defaults to the executable's directory)
    #[arg(long = "base-dir", value_name = "DIR")]
    base_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    color_eyre::install()?;

    let cli = Cli::parse();
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => stamp::default_base_dir()?,
    };
    tracing::debug!(base_dir = %base_dir.display(), "starting revstamp");

    let report = stamp::run(&base_dir)?;
    tracing::info!(
        revision = %report.revision,
        header = %report.header_path.display(),
        substitutions = report.substitutions,
        "wrote version header"
    );

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let ansi = io::stderr().is_terminal() && env::var("REVSTAMP_LOG_NO_COLOR").is_err();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(io::stderr)
        .try_init();
}
