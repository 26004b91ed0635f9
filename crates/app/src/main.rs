use std::process::ExitCode;

use clap::Parser;

mod commands;
mod error;
mod prompt;
mod render;
mod session;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = commands::Cli::parse();
    let settings = match settings::Settings::load(&cli.overrides) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "dhanvikas={level},client={level},engine={level}",
            level = settings.level
        ))
        .init();

    match commands::run(cli.command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {err:?}");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
