//! HTTP server implementation
//!
//! A thin actix-web layer over [`ProviderHub`](crate::core::ProviderHub):
//! each route maps to one hub operation and wraps its result in an
//! [`ApiResponse`](routes::ApiResponse).

pub mod routes;
pub mod server;
pub mod state;

pub use server::{HttpServer, run_server};
pub use state::AppState;
