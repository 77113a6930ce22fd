use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub session: Session,
    pub edge: Edge,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub backend: String, // "file" or "memory"
    pub store_path: String,
    /// Cookie jar persisted between CLI runs. Unset keeps cookies in memory only.
    pub cookie_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Edge {
    pub address: String,
    pub static_dir: String,
    pub secure_cookies: bool,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// File values can be overridden per key, e.g. `LARDER_API__BASE_URL`.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(
            Environment::with_prefix("LARDER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_a_full_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[api]
base_url = "http://localhost:5000/api"

[session]
backend = "memory"
store_path = "/tmp/larder/session.json"

[edge]
address = "127.0.0.1:3000"
static_dir = "public"
secure_cookies = false

[log]
filter = "debug"
"#
        )
        .unwrap();

        let settings = parse_settings(file.path().to_str()).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:5000/api");
        assert_eq!(settings.api.timeout_secs, None);
        assert_eq!(settings.session.backend, "memory");
        assert!(settings.session.cookie_path.is_none());
        assert!(!settings.edge.secure_cookies);
        assert!(settings.edge.cert_path.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("/nonexistent/larder")).is_err());
    }
}
