use backoffice_bot_utils::create_random_secret;
use chrono_tz::Tz;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Bot token for the chat platform API. May be empty in tests,
    /// where an in-memory chat client is used instead.
    pub telegram_bot_token: String,
    /// Secret token expected on inbound chat platform webhooks
    pub webhook_secret_token: String,
    /// Endpoint of the external spreadsheet-automation system.
    /// When unset, terminal transitions are only logged.
    pub automation_webhook_url: Option<String>,
    /// Chat that receives a short notice whenever a payment document
    /// is marked as paid
    pub admin_chat_id: Option<i64>,
    /// Civil time zone for all reminder-time math
    pub timezone: Tz,
    /// Safety ceiling on how far in the future a reminder may be armed.
    /// Bounds unbounded growth of the in-memory timer table.
    pub reminder_max_lead_millis: i64,
}

const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let telegram_bot_token = std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_else(|_| {
            warn!("Did not find TELEGRAM_BOT_TOKEN environment variable. Outbound chat calls will fail.");
            String::new()
        });

        let webhook_secret_token = match std::env::var("WEBHOOK_SECRET_TOKEN") {
            Ok(token) => token,
            Err(_) => {
                info!("Did not find WEBHOOK_SECRET_TOKEN environment variable. Going to create one.");
                let token = create_random_secret(16);
                info!(
                    "Secret token for the inbound webhook was generated and set to: {}",
                    token
                );
                token
            }
        };

        let automation_webhook_url = std::env::var("AUTOMATION_WEBHOOK_URL").ok();
        if automation_webhook_url.is_none() {
            info!("AUTOMATION_WEBHOOK_URL is not set. Status changes will not be reported.");
        }

        let admin_chat_id = std::env::var("ADMIN_CHAT_ID")
            .ok()
            .and_then(|raw| match raw.parse::<i64>() {
                Ok(chat_id) => Some(chat_id),
                Err(_) => {
                    warn!("The given ADMIN_CHAT_ID: {} is not valid and is ignored.", raw);
                    None
                }
            });

        let timezone = match std::env::var("TIMEZONE") {
            Ok(raw) => match raw.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given TIMEZONE: {} is not a valid IANA name, falling back to {}.",
                        raw, DEFAULT_TIMEZONE
                    );
                    DEFAULT_TIMEZONE
                }
            },
            Err(_) => DEFAULT_TIMEZONE,
        };

        Self {
            port,
            telegram_bot_token,
            webhook_secret_token,
            automation_webhook_url,
            admin_chat_id,
            timezone,
            reminder_max_lead_millis: 1000 * 60 * 60 * 24 * 7, // 7 days
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
