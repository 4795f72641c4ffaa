use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::AppResult;
use crate::navigation::{InterfaceKind, NavItem};

#[derive(Serialize)]
struct Navigation {
    interface: InterfaceKind,
    items: &'static [NavItem],
}

/// `GET /navigation/{kind}`: admin, waiter, kitchen o customer
async fn navigation(path: web::Path<String>) -> AppResult<HttpResponse> {
    let interface: InterfaceKind = path.parse()?;
    Ok(HttpResponse::Ok().json(Navigation {
        interface,
        items: interface.navigation(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/navigation/{kind}").route(web::get().to(navigation)));
}
