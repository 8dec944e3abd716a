use crate::config::AppConfig;
use crate::tasks::{InMemoryTaskStore, TaskStore};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tasks: Arc<dyn TaskStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        // Nothing survives a restart; swap in a persistent TaskStore to change that.
        let tasks = Arc::new(InMemoryTaskStore::new()) as Arc<dyn TaskStore>;

        Ok(Self::from_parts(config, tasks))
    }

    pub fn from_parts(config: Arc<AppConfig>, tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            config,
            tasks,
            started_at: Instant::now(),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::development()),
            Arc::new(InMemoryTaskStore::new()),
        )
    }
}
