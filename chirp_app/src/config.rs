use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use chirp_core::Profile;
use posts_client::DEFAULT_BASE_URL;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 1500;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub page_size: u32,
    pub search_debounce: Duration,
    /// The signed-in user. There is no authentication, so this is just configured.
    pub profile: Profile,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let api_base_url = lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let page_size = number(&lookup, "PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            bail!("PAGE_SIZE must be positive");
        }
        let debounce_ms = number(&lookup, "SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?;

        let profile = Profile {
            name: lookup("PROFILE_NAME").unwrap_or_else(|| "Mert Çetin".to_string()),
            username: lookup("PROFILE_USERNAME").unwrap_or_else(|| "mert_cetin".to_string()),
            bio: match lookup("PROFILE_BIO") {
                None => Some("Software Engineer".to_string()),
                Some(bio) if bio.trim().is_empty() => None,
                Some(bio) => Some(bio),
            },
        };

        Ok(Config {
            api_base_url,
            page_size,
            search_debounce: Duration::from_millis(debounce_ms),
            profile,
        })
    }
}

fn number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, value)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3001");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce, Duration::from_millis(1500));
        assert_eq!(config.profile.username, "mert_cetin");
        assert_eq!(config.profile.bio.as_deref(), Some("Software Engineer"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("API_BASE_URL", "http://example.com/api"),
            ("PAGE_SIZE", " 20 "),
            ("SEARCH_DEBOUNCE_MS", "300"),
            ("PROFILE_USERNAME", "ayse"),
            ("PROFILE_BIO", ""),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "http://example.com/api");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.profile.username, "ayse");
        assert_eq!(config.profile.bio, None);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = config(&[("PAGE_SIZE", "ten")]).unwrap_err();
        assert!(err.to_string().contains("PAGE_SIZE"));
        assert!(config(&[("PAGE_SIZE", "0")]).is_err());
        assert!(config(&[("SEARCH_DEBOUNCE_MS", "-1")]).is_err());
    }
}
