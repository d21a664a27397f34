//! HTTP surface over the process-wide [`SessionContext`](crate::SessionContext).

mod routes;

pub use routes::{create_router, create_router_with_name, error_status, AppState};
