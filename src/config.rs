#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => anyhow::bail!("unknown APP_ENV value: {other}"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// Requests without an identity header run as the development user.
    /// Only set when the environment was explicitly named development.
    pub allow_dev_identity: bool,
    pub cors_origin: String,
    pub max_body_bytes: usize,
}

const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("APP_PORT").or_else(|| lookup("PORT")) {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT {v:?}: {e}"))?,
            None => 8080,
        };
        let (environment, allow_dev_identity) =
            match lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
                Some(v) => {
                    let env = Environment::parse(&v)?;
                    (env, !env.is_production())
                }
                None => (Environment::Development, false),
            };
        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| "*".into());
        let max_body_bytes = lookup("MAX_BODY_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        Ok(Self {
            host,
            port,
            environment,
            allow_dev_identity,
            cors_origin,
            max_body_bytes,
        })
    }

    pub fn development() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            environment: Environment::Development,
            allow_dev_identity: true,
            cors_origin: "*".into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.environment, Environment::Development);
        assert!(!cfg.allow_dev_identity);
        assert_eq!(cfg.cors_origin, "*");
        assert_eq!(cfg.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn dev_identity_needs_an_explicit_development_environment() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "development")])).unwrap();
        assert!(cfg.allow_dev_identity);
        let cfg = AppConfig::from_lookup(lookup_from(&[("NODE_ENV", "dev")])).unwrap();
        assert!(cfg.allow_dev_identity);
        let cfg = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "production")])).unwrap();
        assert!(!cfg.allow_dev_identity);
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("PORT", "3001")])).unwrap();
        assert_eq!(cfg.port, 3001);
    }

    #[test]
    fn node_env_is_accepted_for_environment() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("NODE_ENV", "production")])).unwrap();
        assert!(cfg.environment.is_production());
    }

    #[test]
    fn rejects_unknown_environment_and_bad_port() {
        assert!(AppConfig::from_lookup(lookup_from(&[("APP_ENV", "staging")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("APP_PORT", "http")])).is_err());
    }
}
