use std::env;

use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: Url,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        // .env is optional; real environment variables win either way
        let _ = dotenvy::dotenv();

        let raw = env::var("TOYFORGE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_base = Self::normalize(&raw)?;

        Ok(Self { api_base })
    }

    /// Parse and ensure a trailing slash so endpoint joins stay relative
    /// to the configured path.
    fn normalize(raw: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address_parses() {
        let url = AppConfig::normalize(DEFAULT_API_URL).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_base_path_keeps_trailing_slash() {
        let url = AppConfig::normalize("http://host:9000/api").unwrap();
        assert_eq!(url.as_str(), "http://host:9000/api/");
    }
}
