use serde::{Deserialize, Serialize};

/// Payload of the assertion the API gateway forwards in `x-jwt-assertion`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The caller as far as the task API is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn development() -> Self {
        Self {
            id: "dev-user-123".into(),
            email: Some("developer@example.com".into()),
            name: Some("Development User".into()),
            username: Some("devuser".into()),
            groups: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Label stamped into `createdBy`: display name, then email, then the subject.
    pub fn created_by_label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.id.clone())
    }
}

impl From<GatewayClaims> for Identity {
    fn from(c: GatewayClaims) -> Self {
        let name = c.name.filter(|n| !n.is_empty()).or_else(|| {
            let joined = [c.given_name.as_deref(), c.family_name.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        });
        Self {
            id: c.sub,
            email: c.email,
            name,
            username: c.preferred_username,
            groups: c.groups,
            roles: c.roles,
        }
    }
}
