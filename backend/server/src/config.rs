use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

pub const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
pub const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub supabase: Option<SupabaseConfig>,
    pub spotify: Option<SpotifyConfig>,
}

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Clone, Debug)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub accounts_url: String,
    pub api_url: String,
}

impl Config {
    /// Reads `.env` if present, then the process environment and `/run/secrets`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| {
            read_secret(key).or_else(|| env::var(key).ok().filter(|v| !v.is_empty()))
        })
    }

    /// Builds the config from an arbitrary key lookup. Secrets and plain
    /// variables go through the same function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = try_load(&lookup, "RUST_PORT", "8000")?;

        let allowed_origins = parse_origins(&load_or(&lookup, "CORS_ORIGINS", DEFAULT_ORIGINS));
        if allowed_origins.is_empty() {
            bail!("CORS_ORIGINS must name at least one origin");
        }

        let supabase = match lookup("SUPABASE_URL") {
            Some(url) => {
                let anon_key = lookup("SUPABASE_ANON_KEY")
                    .context("SUPABASE_URL is set but SUPABASE_ANON_KEY is missing")?;

                Some(SupabaseConfig {
                    url: trim_base(&url),
                    anon_key,
                })
            }
            None => {
                info!("SUPABASE_URL not set, serving static profiles without authentication");
                None
            }
        };

        let spotify = match (lookup("SPOTIFY_CLIENT_ID"), lookup("SPOTIFY_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(SpotifyConfig {
                client_id,
                client_secret,
                accounts_url: trim_base(&load_or(&lookup, "SPOTIFY_ACCOUNTS_URL", SPOTIFY_ACCOUNTS_URL)),
                api_url: trim_base(&load_or(&lookup, "SPOTIFY_API_URL", SPOTIFY_API_URL)),
            }),
            (None, None) => {
                warn!("Spotify credentials not found, catalogue search disabled");
                None
            }
            _ => bail!("SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set together"),
        };

        Ok(Self {
            port,
            allowed_origins,
            supabase,
            spotify,
        })
    }
}

fn load_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    load_or(lookup, key, default)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value: {e}"))
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(trim_base)
        .collect()
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
        assert!(config.supabase.is_none());
        assert!(config.spotify.is_none());
    }

    #[test]
    fn test_supabase() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        let supabase = config.supabase.unwrap();
        assert_eq!(supabase.url, "https://abc.supabase.co");
        assert_eq!(supabase.anon_key, "anon");
    }

    #[test]
    fn test_supabase_without_key() {
        assert!(Config::from_lookup(lookup(&[("SUPABASE_URL", "https://abc.supabase.co")])).is_err());
    }

    #[test]
    fn test_spotify_pair() {
        assert!(Config::from_lookup(lookup(&[("SPOTIFY_CLIENT_ID", "id")])).is_err());

        let config = Config::from_lookup(lookup(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();

        let spotify = config.spotify.unwrap();
        assert_eq!(spotify.accounts_url, SPOTIFY_ACCOUNTS_URL);
        assert_eq!(spotify.api_url, SPOTIFY_API_URL);
    }

    #[test]
    fn test_bad_port() {
        assert!(Config::from_lookup(lookup(&[("RUST_PORT", "eighty")])).is_err());
    }

    #[test]
    fn test_origins() {
        let config = Config::from_lookup(lookup(&[(
            "CORS_ORIGINS",
            " https://a.example/ , ,https://b.example",
        )]))
        .unwrap();

        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );

        assert!(Config::from_lookup(lookup(&[("CORS_ORIGINS", " , ")])).is_err());
    }
}
