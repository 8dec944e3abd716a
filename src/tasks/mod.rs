mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod validation;

use crate::state::AppState;
use axum::Router;

pub use repo::{InMemoryTaskStore, TaskStore};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::task_routes())
}
