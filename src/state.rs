use crate::api::ApiClient;
use crate::config::Config;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient) -> Self {
        Self { config, api }
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }
}
