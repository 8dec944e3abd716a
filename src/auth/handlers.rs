use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{auth::extractors::AuthUser, error::now_rfc3339, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user/profile", get(get_profile))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
    pub profile_complete: bool,
    pub last_login: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub profile: Profile,
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    let profile_complete = user.name.is_some() && user.email.is_some();
    Json(ProfileResponse {
        message: "User profile retrieved successfully",
        profile: Profile {
            id: user.id,
            email: user.email,
            name: user.name,
            username: user.username,
            groups: user.groups,
            roles: user.roles,
            profile_complete,
            last_login: now_rfc3339(),
        },
    })
}
