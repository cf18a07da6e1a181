use anyhow::Context;
use mart_config::MartConfig;
use mart_db::service::MartService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: MartService,
    pub config: MartConfig,
}

impl AppContext {
    pub async fn init(config: MartConfig) -> anyhow::Result<Self> {
        let target = if config.database.is_remote() {
            config.database.url.clone()
        } else {
            config.database.path.clone()
        };
        let service = MartService::from_config(&config)
            .await
            .with_context(|| format!("failed to open mart database at {target}"))?;
        tracing::debug!(%target, remote = config.database.is_remote(), "database opened");
        Ok(Self { service, config })
    }

    /// Explicit `--limit` wins over the configured default.
    #[must_use]
    pub fn limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.config.general.default_limit)
    }
}
