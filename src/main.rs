use chrono::{Local, NaiveDate};
use clap::Parser;
use volleyball_alerts::config::{Command, LogFormat};
use volleyball_alerts::domain::ports::MailTransport;
use volleyball_alerts::utils::error::ErrorSeverity;
use volleyball_alerts::utils::{logger, validation::Validate};
use volleyball_alerts::{
    find_schedule_conflicts, AlertEngine, AlertError, CliConfig, LogTransport, TeamsFile, WebhookTransport,
};

fn exit_code(e: &AlertError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: AlertError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

fn load_teams(config: &CliConfig) -> volleyball_alerts::Result<TeamsFile> {
    config.validate()?;
    let file = TeamsFile::from_file(&config.config)?;
    file.validate()?;
    tracing::debug!("Loaded {} team(s) from {}", file.teams.len(), config.config.display());
    Ok(file)
}

async fn notify<T: MailTransport>(
    file: &TeamsFile,
    transport: T,
    date: NaiveDate,
    only_to: Option<String>,
) -> volleyball_alerts::Result<bool> {
    let engine = AlertEngine::new(file.team_configs()?, file.venue_directory()?, transport, file.sender())
        .with_only_to(only_to);
    let summary = engine.run(date).await;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(!summary.has_failures())
}

async fn conflicts(file: &TeamsFile) -> volleyball_alerts::Result<bool> {
    let engine = AlertEngine::new(file.team_configs()?, file.venue_directory()?, LogTransport, file.sender());
    let report = engine.season().await;
    let conflicts = find_schedule_conflicts(&report.matches);

    if conflicts.is_empty() {
        println!("✅ No schedule conflicts in {} match(es)", report.matches.len());
    }
    for conflict in &conflicts {
        println!("⚠️  {} is double booked:", conflict.member);
        for game in &conflict.games {
            println!("    {}", game);
        }
    }
    Ok(report.teams_failed == 0)
}

async fn run(config: CliConfig) -> volleyball_alerts::Result<bool> {
    let file = load_teams(&config)?;

    match config.command {
        Command::Notify { date, send, only_to } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            if send {
                let transport = WebhookTransport::new(file.mail_endpoint()?);
                tracing::info!("📨 Sending through {}", transport.endpoint());
                notify(&file, transport, date, only_to).await
            } else {
                tracing::info!("Dry run, pass --send to deliver messages");
                notify(&file, LogTransport, date, only_to).await
            }
        }
        Command::Conflicts => conflicts(&file).await,
    }
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    match config.log_format {
        LogFormat::Text => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting volleyball-alerts");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(config).await {
        Ok(true) => {}
        // Some teams or messages failed; details are already logged.
        Ok(false) => std::process::exit(2),
        Err(e) => fail(e),
    }
}
