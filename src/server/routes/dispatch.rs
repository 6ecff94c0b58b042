//! Request dispatch endpoint
//!
//! `provider_id` dispatches to one provider, `provider_ids` walks an ordered
//! fallback chain, and neither uses the hub's default chain. A client that
//! disconnects drops the handler future, which abandons the dispatch.

use crate::core::router::{DispatchLimits, DispatchOptions};
use crate::core::types::RequestEnvelope;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dispatch", web::post().to(dispatch));
}

/// Body of `POST /api/dispatch`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_ids: Option<Vec<String>>,
    #[serde(flatten)]
    pub request: RequestEnvelope,
    /// Per-attempt timeout override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Retry count override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl DispatchRequest {
    fn options(
        &self,
        defaults: &DispatchOptions,
        limits: &DispatchLimits,
    ) -> Result<DispatchOptions, GatewayError> {
        limits
            .override_options(defaults, self.timeout_secs, self.max_retries)
            .map_err(GatewayError::bad_request)
    }
}

async fn dispatch(
    state: web::Data<AppState>,
    body: web::Json<DispatchRequest>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    if body.request.prompt.trim().is_empty() {
        return Err(GatewayError::bad_request("prompt cannot be empty"));
    }

    let hub = &state.hub;
    let dispatcher = hub.dispatcher();
    let options = body.options(dispatcher.default_options(), dispatcher.limits())?;
    debug!(trace_id = %body.request.trace_id, "dispatch requested");

    let response = match (&body.provider_id, &body.provider_ids) {
        (Some(_), Some(_)) => {
            return Err(GatewayError::bad_request(
                "provide either provider_id or provider_ids, not both",
            ));
        }
        (Some(id), None) => hub.dispatch_with_options(id, &body.request, &options).await?,
        (None, Some(ids)) => {
            hub.dispatch_with_fallback_options(ids.as_slice(), &body.request, &options)
                .await?
        }
        (None, None) => hub.dispatch_default_chain(&body.request, Some(&options)).await?,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
