mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IDocumentRepo, IMessageLocationRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct BotContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub chat: Arc<dyn IChatClient>,
    pub automation: Arc<dyn IAutomationNotifier>,
    pub reminders: Arc<ReminderScheduler>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl BotContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        Self {
            chat: Arc::new(TelegramClient::new(&config.telegram_bot_token)),
            automation: Arc::new(HttpAutomationNotifier::new(
                config.automation_webhook_url.clone(),
            )),
            reminders: Arc::new(ReminderScheduler::new(
                Arc::clone(&sys),
                config.reminder_max_lead_millis,
            )),
            repos,
            config,
            sys,
        }
    }

    /// Context backed by in-memory repositories and recording fakes for
    /// the outbound services. Used by tests.
    pub fn create_inmemory() -> Self {
        let config = Config::new();
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        Self {
            repos: Repos::create_inmemory(),
            chat: Arc::new(InMemoryChatClient::new()),
            automation: Arc::new(InMemoryAutomationNotifier::new()),
            reminders: Arc::new(ReminderScheduler::new(
                Arc::clone(&sys),
                config.reminder_max_lead_millis,
            )),
            config,
            sys,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> BotContext {
    BotContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
