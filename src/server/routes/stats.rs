//! Usage and latency statistics

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stats")
            .route("", web::get().to(all_stats))
            .route("/{id}", web::get().to(provider_stats)),
    );
}

async fn all_stats(state: web::Data<AppState>) -> Result<HttpResponse, GatewayError> {
    let stats = state.hub.get_stats(None)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}

async fn provider_stats(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let mut stats = state.hub.get_stats(Some(&path))?;
    match stats.pop() {
        Some(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        None => Err(crate::core::providers::ProviderError::not_found(path.as_str()).into()),
    }
}
