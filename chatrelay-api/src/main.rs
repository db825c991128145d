use std::path::PathBuf;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use chatrelay_api::config::ApiConfig;
use chatrelay_api::handlers::{self, AppState};
use chatrelay_api::helpers::{assistant::create_assistant_client, cors::cors_headers, logging};
use chatrelay_api::polling::PollPolicy;
use chatrelay_api::proxy::ConversationProxy;
use chatrelay_api::session::{SessionLimits, SessionStore};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chatrelay-api", version, about = "Relay chat messages to a hosted assistant")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_path) =
        ApiConfig::load(cli.config).context("Failed to load configuration")?;
    let _log_guard = logging::init_tracing(&config.logging)?;
    info!(path = %config_path.display(), "Loaded configuration");

    let client = create_assistant_client(&config.openai)?;
    let assistant_id = config.openai.assistant_id()?.to_string();
    let poll_policy = PollPolicy::from(&config.polling);
    info!(
        assistant_id = %assistant_id,
        interval_ms = poll_policy.interval().as_millis() as u64,
        max_attempts = poll_policy.max_attempts(),
        "Assistant proxy configured"
    );

    let session_limits = SessionLimits::from(&config.session);
    info!(
        idle_ttl_secs = session_limits.idle_ttl.as_secs(),
        max_sessions = session_limits.max_sessions,
        "Session limits configured"
    );

    let proxy = ConversationProxy::new(client, assistant_id, poll_policy)
        .with_session_store(SessionStore::with_limits(session_limits));
    let state = web::Data::new(AppState::new(proxy));
    let session_settings = web::Data::new(config.session.clone());
    let cors = config.cors.clone();

    let bind_addr = (config.server.host.clone(), config.server.port);
    info!("Starting chatrelay-api server at http://{}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(session_settings.clone())
            .wrap(cors_headers(&cors))
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
