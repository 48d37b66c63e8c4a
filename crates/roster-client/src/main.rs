use anyhow::Result;
use clap::Parser;
use roster_client::config::Config;
use roster_client::App;
use roster_media::constraints::capture_presets;
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let config = Config::load(&args.config)?;
    let app = App::from_config(&config, args.session.as_deref())?;
    if app.started_new_session() {
        if let Some(id) = app.session_id() {
            tracing::info!("Started new session {}; pass --session {} to reuse it", id, id);
        }
        if matches!(args.command, Command::Status | Command::Revoke | Command::EndSession) {
            tracing::warn!("No --session given; this command acts on an empty new session");
        }
    }

    match args.command {
        Command::Status => {
            let granted = app.camera.was_permission_granted_this_session();
            println!(
                "{}",
                json!({
                    "session": app.session_id(),
                    "backend": config.session.backend,
                    "permission_granted": granted,
                })
            );
        }
        Command::Grant => {
            app.camera.mark_permission_granted_for_session();
            print_session(&app);
        }
        Command::Revoke => {
            app.camera.clear_permission_for_session();
            print_session(&app);
        }
        Command::EndSession => {
            app.end_session()?;
            tracing::info!("Session ended");
        }
        Command::Presets => {
            println!("{}", serde_json::to_string_pretty(&capture_presets())?);
        }
    }

    Ok(())
}

fn print_session(app: &App) {
    println!(
        "{}",
        json!({
            "session": app.session_id(),
            "permission_granted": app.camera.was_permission_granted_this_session(),
        })
    );
}
