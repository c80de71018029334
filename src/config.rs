use anyhow::{Context, Result};

/// The three secrets the crate needs, supplied at application start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer key for the completion endpoint.
    pub api_key: String,
    /// Base URL of the persistence store.
    pub store_url: String,
    /// Anon/service key for the persistence store.
    pub store_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("DEEPSEEK_API_KEY").context("DEEPSEEK_API_KEY not set")?;
        let store_url = std::env::var("SUPABASE_URL").context("SUPABASE_URL not set")?;
        let store_key =
            std::env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY not set")?;
        Ok(Self {
            api_key,
            store_url,
            store_key,
        })
    }
}
