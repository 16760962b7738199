//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_max_size: usize,
    /// Sizing hint for the cache index (0 = index default)
    pub cache_index_hint: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Directory whose files are served
    pub server_root: PathBuf,
    /// Directory holding server pages such as 404.html
    pub server_files: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 10)
    /// - `CACHE_INDEX_HINT` - Cache index sizing hint (default: 0)
    /// - `SERVER_PORT` - HTTP server port (default: 3490)
    /// - `SERVER_ROOT` - Served directory (default: ./serverroot)
    /// - `SERVER_FILES` - Server pages directory (default: ./serverfiles)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any name → value source. Missing or
    /// unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            cache_max_size: parse_var(&lookup, "CACHE_MAX_SIZE")
                .unwrap_or(defaults.cache_max_size),
            cache_index_hint: parse_var(&lookup, "CACHE_INDEX_HINT")
                .unwrap_or(defaults.cache_index_hint),
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            server_root: lookup("SERVER_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.server_root),
            server_files: lookup("SERVER_FILES")
                .map(PathBuf::from)
                .unwrap_or(defaults.server_files),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_size: 10,
            cache_index_hint: 0,
            server_port: 3490,
            server_root: PathBuf::from("./serverroot"),
            server_files: PathBuf::from("./serverfiles"),
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_max_size, 10);
        assert_eq!(config.cache_index_hint, 0);
        assert_eq!(config.server_port, 3490);
        assert_eq!(config.server_root, PathBuf::from("./serverroot"));
        assert_eq!(config.server_files, PathBuf::from("./serverfiles"));
    }

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.cache_max_size, 10);
        assert_eq!(config.cache_index_hint, 0);
        assert_eq!(config.server_port, 3490);
        assert_eq!(config.server_root, PathBuf::from("./serverroot"));
        assert_eq!(config.server_files, PathBuf::from("./serverfiles"));
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_MAX_SIZE", "32"),
            ("CACHE_INDEX_HINT", "64"),
            ("SERVER_PORT", "8080"),
            ("SERVER_ROOT", "/srv/www"),
            ("SERVER_FILES", "/srv/pages"),
        ]));
        assert_eq!(config.cache_max_size, 32);
        assert_eq!(config.cache_index_hint, 64);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_root, PathBuf::from("/srv/www"));
        assert_eq!(config.server_files, PathBuf::from("/srv/pages"));
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_MAX_SIZE", "not-a-number"),
            ("SERVER_PORT", "99999"),
        ]));
        assert_eq!(config.cache_max_size, 10);
        assert_eq!(config.server_port, 3490);
    }
}
