const DEFAULT_API_ROOT: &str = "http://localhost:5000/api";
const API_ROOT_VAR: &str = "TOURMAP_API_ROOT";

/// Where the routing backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_root: String,
}

impl ClientConfig {
    pub fn new(api_root: impl AsRef<str>) -> Self {
        Self {
            api_root: api_root.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Runtime `TOURMAP_API_ROOT`, then the value baked in at compile time,
    /// then the local development server.
    pub fn from_env() -> Self {
        if let Some(url) = runtime_override() {
            return Self::new(url.trim());
        }
        if let Some(url) = option_env!("TOURMAP_API_ROOT") {
            return Self::new(url);
        }
        tracing::debug!("{API_ROOT_VAR} not set, using {DEFAULT_API_ROOT}");
        Self::new(DEFAULT_API_ROOT)
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn pois_url(&self) -> String {
        format!("{}/pois", self.api_root)
    }

    pub fn route_url(&self) -> String {
        format!("{}/route", self.api_root)
    }

    pub fn block_road_url(&self) -> String {
        format!("{}/block_road", self.api_root)
    }

    pub fn reset_blocks_url(&self) -> String {
        format!("{}/reset_blocks", self.api_root)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_override() -> Option<String> {
    std::env::var(API_ROOT_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn runtime_override() -> Option<String> {
    None
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
