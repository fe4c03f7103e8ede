mod cli;
mod config;
mod error;
mod fetch;
mod fs;
mod github;
mod install;
mod resolve;
#[cfg(test)]
mod testing;
mod types;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::load_settings;
use console::style;
use fetch::HttpFetcher;
use fs::LocalFs;
use install::install_binary;
use resolve::resolve_plan;
use std::path::PathBuf;
use types::{Asset, TOOL_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse().absorb_logging_flags();

    // Setup logging
    setup_logging(&cli)?;

    let settings = load_settings()?;
    tracing::debug!("Installer settings: {:?}", settings);

    print_banner(&cli);

    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from);
    let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    let fetcher = HttpFetcher::new(token, !cli.quiet)?;

    let args = cli.installer_args();
    let plan = resolve_plan(&args, home.as_deref(), &settings, &fetcher).await?;

    say(&cli, format!("version: {}", plan.version));
    say(&cli, format!("install to: {}", plan.target_path().display()));
    match plan.asset {
        Asset::Aarch64 => say(&cli, "aarch64 detected"),
        Asset::X86_64 => say(&cli, "using x86_64 binary"),
    }

    install_binary(&plan, &settings, &fetcher, &LocalFs).await?;

    say(
        &cli,
        format!(
            "{} Try running '{} --help'.",
            style("Finished komodo-cli setup.").green().bold(),
            TOOL_NAME
        ),
    );
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn print_banner(cli: &Cli) {
    let rule = "======================";
    say(cli, rule);
    say(cli, style(" KOMODO CLI INSTALLER ").bold().to_string());
    say(cli, rule);
}

fn say(cli: &Cli, line: impl std::fmt::Display) {
    if !cli.quiet {
        println!("{}", line);
    }
}
