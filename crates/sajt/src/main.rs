//! sajt CLI - static site generator with a rebuild loop and dev server.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::{ConfigFile, Overrides};

const MISSING_DIRS: &str =
    "Ange både innehållsmapp och utmatningsmapp: sajt <innehåll> <ut> [-p]";

#[derive(Parser)]
#[command(name = "sajt")]
#[command(about = "Static site generator with a rebuild loop and dev server")]
#[command(version)]
pub struct Cli {
    /// Content directory
    content: Option<PathBuf>,

    /// Output directory
    out: Option<PathBuf>,

    /// Leave drafts out of the site
    #[arg(short, long)]
    publish: bool,

    /// Directory with templates, CSS and JavaScript
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Port for the dev server
    #[arg(long)]
    port: Option<u16>,

    /// Seconds between rebuilds
    #[arg(long)]
    interval: Option<u64>,

    /// Build once and exit, without the dev server
    #[arg(long)]
    once: bool,

    /// Open the site in a browser
    #[arg(long)]
    open: bool,

    /// Path to sajt.toml config file
    #[arg(short, long, default_value = "sajt.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Content and output directories, both required.
    fn dirs(&self) -> Result<(PathBuf, PathBuf)> {
        match (&self.content, &self.out) {
            (Some(content), Some(out)) => Ok((content.clone(), out.clone())),
            _ => anyhow::bail!(MISSING_DIRS),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (content, out) = cli.dirs()?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let settings = ConfigFile::load(&cli.config)?.resolve(Overrides {
        content,
        out,
        publish: cli.publish,
        source: cli.source,
        port: cli.port,
        interval: cli.interval,
        open: cli.open,
    });

    if cli.once {
        commands::build::run(settings.build).await?;
    } else {
        commands::dev::run(settings).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_dirs_are_required() {
        let cli = Cli::try_parse_from(["sajt"]).unwrap();
        assert_eq!(cli.dirs().unwrap_err().to_string(), MISSING_DIRS);

        let cli = Cli::try_parse_from(["sajt", "innehall"]).unwrap();
        assert_eq!(cli.dirs().unwrap_err().to_string(), MISSING_DIRS);
    }

    #[test]
    fn reads_dirs_and_flags() {
        let cli = Cli::try_parse_from(["sajt", "innehall", "ut", "-p", "--once"]).unwrap();

        let (content, out) = cli.dirs().unwrap();

        assert_eq!(content, PathBuf::from("innehall"));
        assert_eq!(out, PathBuf::from("ut"));
        assert!(cli.publish);
        assert!(cli.once);
    }
}
