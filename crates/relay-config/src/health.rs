use serde::Deserialize;

/// Liveness probe served on `GET {path}`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Route path, must start with `/`; defaults to the site root
    #[serde(default = "root_path")]
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: enabled_by_default(),
            path: root_path(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn enabled_by_default() -> bool {
    true
}

fn root_path() -> String {
    "/".to_owned()
}
