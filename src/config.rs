//! Build-time settings, read from the environment when the wasm bundle is built.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
}

impl BackendConfig {
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` runs the app on the bundled sample data.
    pub backend: Option<BackendConfig>,
    /// Viewer id that likes are recorded against.
    pub user_id: Option<String>,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("LOVEY_DOGEY_API_URL"),
            option_env!("LOVEY_DOGEY_API_KEY"),
            option_env!("LOVEY_DOGEY_USER_ID"),
        )
    }

    pub fn from_values(url: Option<&str>, key: Option<&str>, user_id: Option<&str>) -> Self {
        let backend = url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| BackendConfig {
                base_url: url.to_string(),
                api_key: key.unwrap_or_default().to_string(),
            });
        let user_id = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Self { backend, user_id }
    }

    pub fn is_offline(&self) -> bool {
        self.backend.is_none()
    }
}
