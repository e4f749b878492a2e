use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite connection URL for search/view history
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Raw movie catalog (CSV)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Cleaned catalog written after the first load and reused afterwards
    #[serde(default = "default_processed_path")]
    pub processed_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Vocabulary cap for the TF-IDF vectorizer
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Number of searches kept per user
    #[serde(default = "default_search_history_limit")]
    pub search_history_limit: i64,

    /// Number of viewed movies kept per user
    #[serde(default = "default_view_history_limit")]
    pub view_history_limit: i64,

    /// History owner; there is no authentication layer
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_database_url() -> String {
    "sqlite://data/user_history.db".to_string()
}

fn default_catalog_path() -> String {
    "data/raw/movies.csv".to_string()
}

fn default_processed_path() -> String {
    "data/processed/cleaned_movies.csv".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_features() -> usize {
    6000
}

fn default_search_history_limit() -> i64 {
    50
}

fn default_view_history_limit() -> i64 {
    30
}

fn default_user_id() -> String {
    "default".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.database_url, "sqlite://data/user_history.db");
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_features, 6000);
        assert_eq!(config.search_history_limit, 50);
        assert_eq!(config.view_history_limit, 30);
        assert_eq!(config.user_id, "default");
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("HOST".to_string(), "127.0.0.1".to_string()),
            ("VIEW_HISTORY_LIMIT".to_string(), "5".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.view_history_limit, 5);
    }
}
