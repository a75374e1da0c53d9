mod dispatcher;
mod document;
mod error;
mod shared;
mod status;

use actix_web::{dev::Server, middleware, web, App, HttpServer};
use backoffice_bot_infra::BotContext;
use std::net::TcpListener;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
    dispatcher::configure_routes(cfg);
    document::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    context: BotContext,
}

impl Application {
    pub async fn new(context: BotContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::log_document_inventory(context.clone());
        Ok(Self {
            server,
            port,
            context,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Reminders do not survive a restart, so at boot we at least log
    /// what is still pending and would have to be re-armed by hand.
    fn log_document_inventory(context: BotContext) {
        actix_web::rt::spawn(async move {
            match context.repos.documents.find_all().await {
                Ok(documents) => {
                    let pending = documents.iter().filter(|d| !d.is_completed()).count();
                    info!(
                        "Loaded {} documents from the database, {} still pending",
                        documents.len(),
                        pending
                    );
                }
                Err(e) => error!("Unable to load the document inventory: {:?}", e),
            }
        });
    }

    async fn configure_server(context: BotContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();
            App::new()
                .wrap(TracingLogger::default())
                .wrap(middleware::Compress::default())
                .app_data(web::Data::new(ctx))
                .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                    crate::error::BotError::BadClientData(err.to_string()).into()
                }))
                .configure(configure_server_api)
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        // Pending timers hold clones of the context; drop them so the
        // process can exit
        self.context.reminders.cancel_all();
        res
    }
}
