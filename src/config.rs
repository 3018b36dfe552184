use std::{fs::File, io::BufReader};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    pub fonts: FontConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self { Self { port: 8080 } }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub table: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self { url: String::new(), key: String::new(), table: "news_articles".to_string() }
    }
}

/// Font assets must be TTF or OTF; the font stack does not decode WOFF2.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub regular_url: String,
    pub bold_url: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            regular_url: "https://rsms.me/inter/font-files/Inter-Regular.otf".to_string(),
            bold_url: "https://rsms.me/inter/font-files/Inter-Bold.otf".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, then apply environment
    /// overrides and validate. A missing file is fine (environment-only
    /// deployments); a malformed one is not.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = match File::open(path) {
            Ok(file) => serde_yaml::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse {path}"))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err).with_context(|| format!("Failed to open {path}")),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values. The lookup
    /// is injected so tests don't mutate process-global state.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SUPABASE_URL") {
            self.supabase.url = url;
        }
        if let Some(key) = var("SUPABASE_ANON_KEY") {
            self.supabase.key = key;
        }
    }

    /// Reject configurations that can't produce a working handler. Called
    /// at startup so a misconfigured process never begins serving.
    pub fn validate(&self) -> Result<()> {
        if self.supabase.url.is_empty() {
            bail!("Supabase URL is required (supabase.url or SUPABASE_URL)");
        }
        if self.supabase.key.is_empty() {
            bail!("Supabase key is required (supabase.key or SUPABASE_ANON_KEY)");
        }
        if self.supabase.table.is_empty() {
            bail!("Article table name must not be empty");
        }
        if self.fonts.family.is_empty()
            || self.fonts.regular_url.is_empty()
            || self.fonts.bold_url.is_empty()
        {
            bail!("Font family and font URLs must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|name| match name {
            "SUPABASE_URL" => Some("https://example.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("anon-key".to_string()),
            _ => None,
        });
        assert_eq!(config.supabase.url, "https://example.supabase.co");
        assert_eq!(config.supabase.key, "anon-key");
        assert_eq!(config.supabase.table, "news_articles");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_credentials() {
        let mut config = Config::default();
        assert!(config.validate().is_err());
        config.supabase.url = "https://example.supabase.co".to_string();
        assert!(config.validate().is_err());
        config.supabase.key = "anon-key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_fonts() {
        let mut config = Config::default();
        config.apply_env(|_| Some("value".to_string()));
        config.fonts.regular_url.clear();
        assert!(config.validate().is_err());
    }
}
