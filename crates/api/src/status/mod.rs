use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusResponse {
    message: String,
}

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        message: "Backoffice bot is running".into(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
