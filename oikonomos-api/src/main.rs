use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::{Parser, Subcommand, ValueEnum};
use oikonomos_api::bot::Bot;
use oikonomos_api::config::ApiConfig;
use oikonomos_api::handlers::{self, jobs::JobsState, webhook::WebhookState, ManagementState};
use oikonomos_api::helpers::{self, dates::parse_period};
use oikonomos_api::integrations::{TelegramApi, TelegramClient};
use oikonomos_api::jobs::{MonthClosingJob, RecurringBillsJob};
use oikonomos_api::Database;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[get("/")]
async fn online() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("online")
}

#[get("/health")]
async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    // Test database connection
    match db.async_connection.lock().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, global = true)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Run one batch job and print its report
    Job {
        #[arg(value_enum)]
        name: JobName,
        /// Month to close, as YYYY-MM (month-closing only)
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum JobName {
    RecurringBills,
    MonthClosing,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("oikonomos-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Load config
    let (config, config_path) = ApiConfig::load().expect("Failed to load config");
    tracing::info!("Loaded config from {}", config_path.display());
    let tz = config.locale.tz().expect("Invalid locale.timezone");

    // Initialize database
    let db = helpers::database::initialize_database(&config.database)
        .expect("Failed to initialize database");

    let telegram: Arc<dyn TelegramApi> = Arc::new(TelegramClient::new(&config.telegram));
    if config.telegram.bot_token.is_empty() {
        tracing::warn!("telegram.bot_token is empty; replies and notifications will fail");
    }

    if let Some(Command::Job { name, period }) = args.command {
        return run_job(&config, db, telegram, tz, name, period.as_deref()).await;
    }

    let bot = Arc::new(Bot::new(
        db.async_connection.clone(),
        telegram.clone(),
        tz,
        config.telegram.allowed_chat_ids.clone(),
    ));
    let webhook_state = WebhookState {
        bot,
        secret: config.telegram.webhook_secret.clone().filter(|s| !s.is_empty()),
    };
    let jobs_state = JobsState {
        token: config.jobs.token.clone(),
        notify_users: config.jobs.notify_users,
        tz,
        telegram,
    };
    if jobs_state.token.is_none() {
        tracing::info!("jobs.token is not set; job trigger endpoints are disabled");
    }
    let management_state = ManagementState {
        token: config.server.admin_token.clone().filter(|t| !t.is_empty()),
    };
    if management_state.token.is_none() {
        tracing::info!("server.admin_token is not set; management endpoints are disabled");
    }

    let (host, port) = (config.server.host.clone(), config.server.port);
    tracing::info!("Starting server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(tz))
            .app_data(web::Data::new(webhook_state.clone()))
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(web::Data::new(management_state.clone()))
            .service(online)
            .service(health)
            .configure(handlers::configure_bot)
            .configure(handlers::configure_management)
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await
}

async fn run_job(
    config: &ApiConfig,
    db: Arc<Database>,
    telegram: Arc<dyn TelegramApi>,
    tz: chrono_tz::Tz,
    name: JobName,
    period: Option<&str>,
) -> std::io::Result<()> {
    let now = chrono::Utc::now();
    let result = match name {
        JobName::RecurringBills => RecurringBillsJob::new(db.async_connection.clone()).run(now).await,
        JobName::MonthClosing => {
            let period = period
                .map(parse_period)
                .transpose()
                .map_err(|e| std::io::Error::other(format!("invalid --period: {e:#}")))?;
            let telegram = config.jobs.notify_users.then_some(telegram);
            MonthClosingJob::new(db.async_connection.clone(), telegram, tz)
                .run(period, now)
                .await
        }
    };

    match result {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.errors.is_empty() {
                tracing::warn!("{} finished with {} errors", report.job, report.errors.len());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("{:?} job failed: {:#}", name, e);
            Err(std::io::Error::other(format!("{name:?} job failed: {e:#}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telegram() -> Arc<dyn TelegramApi> {
        Arc::new(TelegramClient::new(&Default::default()))
    }

    #[actix_web::test]
    async fn test_run_job_reports_failures_as_errors() {
        let config = ApiConfig::default();
        let db = Arc::new(Database::in_memory().unwrap());
        let tz = chrono_tz::America::Sao_Paulo;

        let err = run_job(&config, db.clone(), telegram(), tz, JobName::MonthClosing, Some("2026-13"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid --period"));

        run_job(&config, db.clone(), telegram(), tz, JobName::RecurringBills, None)
            .await
            .unwrap();

        db.async_connection
            .lock()
            .await
            .unwrap()
            .execute_batch("DROP TABLE scheduled_transactions")
            .unwrap();
        let err = run_job(&config, db, telegram(), tz, JobName::RecurringBills, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("job failed"));
    }
}
