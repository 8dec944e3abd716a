use crate::state::AppState;
use axum::Router;

mod claims;
pub(crate) mod extractors;
pub mod handlers;

#[cfg(test)]
pub use claims::GatewayClaims;
pub use extractors::AuthUser;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
