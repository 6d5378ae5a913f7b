mod config;
mod errors;
mod interviews;
mod layout;
mod questions;
mod report;
mod routes;
mod state;
mod vendors;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interviews::registry::RedisRegistry;
use crate::interviews::{InMemoryRegistry, InterviewRegistry};
use crate::report::{ReportGenerator, ReportScheduler, ReportSettings};
use crate::routes::build_router;
use crate::state::AppState;
use crate::vendors::{ElevenLabsClient, SmtpMailer, TwilioClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting callscreen v{}", env!("CARGO_PKG_VERSION"));

    // Pending-interview registry
    let registry: Arc<dyn InterviewRegistry> = match &config.redis_url {
        Some(url) => {
            let redis = RedisRegistry::connect(url)
                .await
                .context("Failed to connect to Redis")?;
            info!("Interview registry: Redis");
            Arc::new(redis)
        }
        None => {
            info!("Interview registry: in-memory");
            Arc::new(InMemoryRegistry::new())
        }
    };

    // Vendor clients
    let sms = Arc::new(
        TwilioClient::new(
            &config.twilio_base_url,
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_phone_number.clone(),
        )
        .context("Failed to build Twilio client")?,
    );
    let conversations = Arc::new(
        ElevenLabsClient::new(&config.elevenlabs_base_url, config.elevenlabs_api_key.clone())
            .context("Failed to build ElevenLabs client")?,
    );
    let mailer = Arc::new(
        SmtpMailer::new(
            &config.smtp_host,
            &config.email_user,
            &config.email_pass,
            &config.email_to,
        )
        .context("Failed to build SMTP mailer")?,
    );
    info!("Vendor clients initialized (SMTP host: {})", config.smtp_host);

    // Post-call report pipeline
    let generator = ReportGenerator::new(
        conversations,
        registry.clone(),
        mailer,
        ReportSettings {
            page_size: config.conversation_page_size,
            report_dir: config.report_dir.clone(),
            include_questionnaire: config.include_questionnaire,
        },
    );
    let scheduler = Arc::new(ReportScheduler::new(
        Arc::new(generator),
        Duration::from_secs(config.report_delay_secs),
    ));
    info!(
        "Reports: {}s after hang-up, written to {}, questionnaire {}",
        scheduler.delay().as_secs(),
        config.report_dir.display(),
        if config.include_questionnaire { "on" } else { "off" }
    );

    // Build app state
    let state = AppState {
        registry,
        sms,
        scheduler,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
