use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "roster-camera", about = "Inspect the roster app's camera session state")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/roster.toml")]
    pub config: String,

    /// Session id for the file-backed store (a new one is generated if omitted)
    #[arg(short, long)]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show whether camera permission was granted this session
    Status,
    /// Record that camera permission was granted
    Grant,
    /// Forget the camera permission grant
    Revoke,
    /// End the session, dropping everything stored for it
    EndSession,
    /// List the capture presets
    Presets,
}
