use crate::common::error::ConfigError;
use crate::config::settings::AppConfig;
use crate::infrastructure::http::ServiceClient;
use crate::modules::render::ResourceStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub api: ServiceClient,
    pub resources: ResourceStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let api = ServiceClient::new(&config)?;
        Ok(Self {
            config,
            api,
            resources: ResourceStore::default(),
        })
    }
}
