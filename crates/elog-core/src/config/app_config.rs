use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the logbook REST API (may be empty - this is a fact, not an error)
    pub api_endpoint: String,

    /// HTTP request timeout in seconds (0 = not set)
    pub request_timeout_secs: u64,

    /// Extra attempts for failed idempotent requests
    pub retry_attempts: u32,

    /// Backoff step between retries, in milliseconds
    pub retry_backoff_ms: u64,

    /// Entries per page (0 = not set)
    pub page_size: usize,

    /// Directory for locally persisted drafts (path info only, no existence check)
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Missing keys map to empty values.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let section = |name: &str, key: &str| toml_value.get(name).and_then(|s| s.get(key));

        Ok(Self {
            api_endpoint: section("api", "endpoint")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            request_timeout_secs: section("api", "timeout_secs")
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64,
            retry_attempts: section("api", "retry_attempts")
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u32,
            retry_backoff_ms: section("api", "retry_backoff_ms")
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64,
            page_size: section("feed", "page_size")
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as usize,
            data_dir: PathBuf::from(
                section("storage", "data_dir")
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            api_endpoint: String::new(),
            request_timeout_secs: 0,
            retry_attempts: 0,
            retry_backoff_ms: 0,
            page_size: 0,
            data_dir: PathBuf::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_maps_all_sections() {
        let value: toml::Value = toml::from_str(
            r#"
            [api]
            endpoint = "http://localhost:8080/"
            timeout_secs = 10
            retry_attempts = 2
            retry_backoff_ms = 250

            [feed]
            page_size = 50

            [storage]
            data_dir = "/tmp/elog"
            "#,
        )
        .unwrap();

        let config = AppConfig::from_toml(&value).unwrap();
        assert_eq!(config.api_endpoint, "http://localhost:8080/");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.retry_backoff_ms, 250);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/elog"));
    }

    #[test]
    fn test_from_toml_accepts_missing_sections() {
        let value: toml::Value = toml::from_str("").unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap(), AppConfig::empty());
    }
}
