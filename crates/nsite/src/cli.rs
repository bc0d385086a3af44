use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use nsite_conf::Settings;
use nsite_content::ContentService;

use crate::args::Args;
use crate::commands::Command;
use crate::commands::NsiteCommand;
use crate::logging;

/// Fetch published Notion content and print it as JSON.
#[derive(Parser)]
#[command(name = "nsite")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: NsiteCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments and execute the chosen command
pub async fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });
    let global = &cli.args.global;

    let project_root = resolve_project_root(global.project_dir.as_ref())?;

    // Credentials usually live in `.env` next to the site. Variables already
    // set in the process win.
    let env_file = project_root.join(".env");
    if let Err(e) = dotenvy::from_path(&env_file) {
        if !e.not_found() {
            eprintln!("warning: ignoring {env_file}: {e}");
        }
    }

    let settings =
        Settings::new(project_root.as_std_path()).context("Failed to load settings")?;

    let _guard = logging::init_tracing(global, settings.debug);
    tracing::debug!(
        %project_root,
        api = %settings.notion.api_base_url,
        assets = %settings.assets.dir,
        "loaded settings"
    );

    let service = ContentService::from_settings(&settings, &project_root)
        .context("Failed to set up the Notion client")?;

    let exit = cli.command.execute(&service).await?;
    Ok(exit.finish())
}

fn resolve_project_root(project_dir: Option<&Utf8PathBuf>) -> Result<Utf8PathBuf> {
    if let Some(dir) = project_dir {
        return Ok(dir.clone());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|_| anyhow::anyhow!("Current directory is not valid UTF-8"))
}
