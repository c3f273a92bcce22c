use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::http::{DEFAULT_TIMEOUT_SECS, HttpMailApi};

pub const SESSION_COOKIE_ENV: &str = "WEBMAIL_SESSION_COOKIE";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<String>,
}

impl Config {
    fn template() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            session_cookie: None,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            log_file: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Cookie from the file, else from the environment.
    pub fn session_cookie(&self) -> Option<String> {
        self.session_cookie
            .clone()
            .or_else(|| std::env::var(SESSION_COOKIE_ENV).ok())
    }

    pub fn http_api(&self) -> Result<HttpMailApi> {
        let cookie = self.session_cookie();
        Ok(HttpMailApi::new(
            &self.base_url,
            cookie.as_deref(),
            self.timeout(),
        )?)
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("rs_webmail_client"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn default_log_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("client.log");
    Ok(p)
}

pub fn resolve_log_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.log_file {
        Ok(PathBuf::from(p))
    } else {
        default_log_path()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // create a template config for users to edit
        let tom = toml::to_string_pretty(&Config::template())?;
        fs::write(path, tom)?;
        return Err(anyhow::anyhow!(
            "Created template config at {}, set base_url and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rs_webmail_client-{}-{name}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir.join("config.toml")
    }

    #[test]
    fn missing_file_writes_template() {
        let path = scratch_path("template");
        let _ = fs::remove_file(&path);

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Created template config"));

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg, Config::template());
    }

    #[test]
    fn optional_fields_default() {
        let path = scratch_path("minimal");
        fs::write(&path, "base_url = \"http://mail.local/\"\n").unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.base_url, "http://mail.local/");
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(cfg.log_file.is_none());
    }
}
