use backoffice_bot_domain::AutomationAction;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info};

/// Payload of the fire-and-forget webhook towards the external
/// spreadsheet-automation system
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationEvent {
    pub action: AutomationAction,
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

/// Reports terminal status changes back to the external automation
/// system. Best-effort: failures are logged and never roll back the
/// local transition.
#[async_trait::async_trait]
pub trait IAutomationNotifier: Send + Sync {
    async fn notify(&self, event: AutomationEvent);
}

pub struct HttpAutomationNotifier {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl HttpAutomationNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("To build the http client");
        Self { http, webhook_url }
    }
}

#[async_trait::async_trait]
impl IAutomationNotifier for HttpAutomationNotifier {
    async fn notify(&self, event: AutomationEvent) {
        let url = match &self.webhook_url {
            Some(url) => url,
            None => {
                debug!("No automation webhook configured, skipping {:?}", event);
                return;
            }
        };

        match self.http.post(url).json(&event).send().await {
            Ok(res) => {
                info!(
                    "Automation webhook {} for file {} responded with status: {}",
                    event.action.as_str(),
                    event.file_id,
                    res.status()
                );
            }
            Err(e) => {
                error!("Error informing the automation system of {:?}: {:?}", event, e);
            }
        }
    }
}

/// Notifier that only records the events it was asked to send.
/// Used by tests.
pub struct InMemoryAutomationNotifier {
    events: Mutex<Vec<AutomationEvent>>,
}

impl InMemoryAutomationNotifier {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<AutomationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Default for InMemoryAutomationNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IAutomationNotifier for InMemoryAutomationNotifier {
    async fn notify(&self, event: AutomationEvent) {
        self.events.lock().unwrap().push(event);
    }
}
