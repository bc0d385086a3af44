use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct GlobalArgs {
    /// Only log errors.
    #[arg(global = true, long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use verbose logging. Repeat for more detail.
    #[arg(global = true, action = clap::ArgAction::Count, long, short, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Directory holding `nsite.toml` and `.env`. Defaults to the current directory.
    #[arg(global = true, long, value_name = "DIR")]
    pub project_dir: Option<Utf8PathBuf>,

    /// Also write logs to daily-rotated files in this directory.
    #[arg(global = true, long, value_name = "DIR")]
    pub log_dir: Option<Utf8PathBuf>,
}
