//! HTTP plumbing shared by the built-in adapters

pub mod connection_pool;

pub use connection_pool::{api_url, GlobalPoolManager, HttpMethod, HttpResponse, PoolConfig};
