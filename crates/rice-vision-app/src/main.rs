use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use rice_vision_app::{
    AnalysisReport, AppConfig, AppError, analyze_path, app_version, build_client, init_tracing,
};
use rice_vision_ui::{HandoffInbox, NotificationLevel, ResultPresenter, UiEffect, UploadController};

const USAGE: &str = "usage: rice-vision <analyze <image-path> | health | version>";

enum Command {
    Analyze(PathBuf),
    Health,
    Version,
}

fn parse_command(mut args: impl Iterator<Item = String>) -> Result<Command, AppError> {
    match args.next().as_deref() {
        Some("analyze") => args
            .next()
            .map(|path| Command::Analyze(PathBuf::from(path)))
            .ok_or_else(|| AppError::Usage("analyze needs an image path".to_string())),
        Some("health") => Ok(Command::Health),
        Some("version" | "--version" | "-V") => Ok(Command::Version),
        Some(other) => Err(AppError::Usage(format!("unknown command {other:?}"))),
        None => Err(AppError::Usage("missing command".to_string())),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(%error, "rice-vision failed");
            eprintln!("{error}");
            if matches!(error, AppError::Usage(_)) {
                eprintln!("{USAGE}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, AppError> {
    let command = parse_command(std::env::args().skip(1))?;
    if let Command::Version = command {
        println!("rice-vision v{}", app_version());
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format)?;
    tracing::info!(version = app_version(), endpoint = %config.endpoint, mock = config.mock, "starting");

    let client = build_client(&config)?;
    match command {
        Command::Health => {
            let healthy = client.health_check().await?;
            println!("{}", if healthy { "healthy" } else { "unhealthy" });
            Ok(if healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Analyze(path) => {
            let mut controller = UploadController::new(client);
            let presenter = ResultPresenter::new(Arc::new(HandoffInbox::new()));
            let report = analyze_path(&mut controller, &presenter, &path).await?;
            print_report(&report);
            Ok(if report.succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Version => Ok(ExitCode::SUCCESS),
    }
}

fn print_report(report: &AnalysisReport) {
    for effect in &report.effects {
        match effect {
            UiEffect::Toast(notification) => match notification.level {
                NotificationLevel::Success => println!("[ok] {}", notification.message),
                NotificationLevel::Error => eprintln!("[error] {}", notification.message),
            },
            other => tracing::debug!(?other, "effect has no terminal rendering"),
        }
    }

    if let Some(view) = &report.view {
        println!("{view}");
    }
}
