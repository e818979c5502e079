use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crawl_logging::crawl_info;
use outlink_engine::{
    CollectSettings, ExtractorSettings, FetchSettings, LinkPatterns, PatternError,
    DEFAULT_ABSOLUTE_PREFIX, DEFAULT_IGNORED_SUFFIX,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error(transparent)]
    Patterns(#[from] PatternError),
}

/// Optional overrides read from a RON file; unset fields keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub max_source_url_len: Option<usize>,
    pub chunk_size: Option<usize>,
    pub initial_capacity: Option<usize>,
    pub absolute_prefix: Option<String>,
    pub ignored_suffix: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        crawl_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            user_agent: self.user_agent.clone().unwrap_or_else(|| defaults.user_agent.clone()),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            ..defaults
        }
    }

    pub fn extractor_settings(&self) -> Result<ExtractorSettings, ConfigError> {
        let defaults = ExtractorSettings::default();
        let patterns = match (&self.absolute_prefix, &self.ignored_suffix) {
            (None, None) => LinkPatterns::default(),
            (prefix, suffix) => LinkPatterns::new(
                prefix.as_deref().unwrap_or(DEFAULT_ABSOLUTE_PREFIX),
                suffix.as_deref().unwrap_or(DEFAULT_IGNORED_SUFFIX),
            )?,
        };
        Ok(ExtractorSettings {
            max_source_url_len: self
                .max_source_url_len
                .unwrap_or(defaults.max_source_url_len),
            collect: CollectSettings {
                chunk_size: self.chunk_size.unwrap_or(defaults.collect.chunk_size),
                initial_capacity: self
                    .initial_capacity
                    .unwrap_or(defaults.collect.initial_capacity),
            },
            patterns,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{AppConfig, ConfigError};
    use outlink_engine::{FetchSettings, DEFAULT_MAX_SOURCE_URL_LEN};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("outlink.ron");
        std::fs::write(&path, "()").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        let settings = config.extractor_settings().unwrap();
        assert_eq!(settings.max_source_url_len, DEFAULT_MAX_SOURCE_URL_LEN);
        assert_eq!(
            config.fetch_settings().user_agent,
            FetchSettings::default().user_agent
        );
    }

    #[test]
    fn overrides_are_applied() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("outlink.ron");
        std::fs::write(
            &path,
            r#"(
                max_source_url_len: Some(120),
                chunk_size: Some(4096),
                ignored_suffix: Some("\\.(pdf|zip)$"),
                user_agent: Some("outlink-test/1.0"),
                request_timeout_secs: Some(5),
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        let settings = config.extractor_settings().unwrap();
        assert_eq!(settings.max_source_url_len, 120);
        assert_eq!(settings.collect.chunk_size, 4096);
        assert_eq!(settings.collect.initial_capacity, 1024 * 1024);
        assert!(settings.patterns.ignored_suffix().is_match("http://a.example/x.zip"));
        assert!(!settings.patterns.ignored_suffix().is_match("http://a.example/x.css"));

        let fetch = config.fetch_settings();
        assert_eq!(fetch.user_agent, "outlink-test/1.0");
        assert_eq!(fetch.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load(&dir.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.ron");
        std::fs::write(&path, "(chunk_size: \"lots\")").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let config = AppConfig {
            absolute_prefix: Some("(".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.extractor_settings(),
            Err(ConfigError::Patterns(_))
        ));
    }
}
