//! Provider listing and connectivity tests

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/providers")
            .route("", web::get().to(list_providers))
            .route("/test", web::post().to(test_all_providers))
            .route("/{id}/test", web::post().to(test_provider)),
    );
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only providers with this enabled flag
    pub enabled: Option<bool>,
}

async fn list_providers(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, GatewayError> {
    let providers = state.hub.list_providers(query.enabled);
    Ok(HttpResponse::Ok().json(ApiResponse::success(providers)))
}

async fn test_all_providers(state: web::Data<AppState>) -> Result<HttpResponse, GatewayError> {
    debug!("Testing all enabled providers");
    let results = state.hub.test_all_providers().await;
    let healthy = results.values().filter(|result| result.succeeded).count();
    let meta = serde_json::json!({ "total": results.len(), "healthy": healthy });
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_meta(results, meta)))
}

async fn test_provider(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let result = state.hub.test_provider(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}
