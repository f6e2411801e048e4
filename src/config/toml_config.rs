use crate::core::pagination::DEFAULT_MAX_PAGE_SIZE;
use crate::domain::ports::PaginationSettings;
use crate::utils::error::{HerdError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_one_of, validate_path, validate_positive_number,
    validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HerdConfig {
    #[serde(default)]
    pub pagination: PaginationConfig,
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub max_page_size: Option<usize>,
    pub default_page_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub herd_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl HerdConfig {
    /// 只指定畜群檔案，其他設定用預設值
    pub fn for_herd_file(herd_file: &str) -> Self {
        Self {
            pagination: PaginationConfig::default(),
            storage: StorageConfig {
                herd_file: herd_file.to_string(),
            },
            logging: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HerdError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HerdError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HERD_FILE})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HerdError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("storage.herd_file", &self.storage.herd_file)?;
        validate_file_extension("storage.herd_file", &self.storage.herd_file, &["csv", "json"])?;

        let max_page_size = self.max_page_size();
        validate_positive_number("pagination.max_page_size", max_page_size, 1)?;
        if let Some(default_page_size) = self.pagination.default_page_size {
            validate_range("pagination.default_page_size", default_page_size, 1, max_page_size)?;
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        Ok(())
    }

    pub fn herd_file(&self) -> &str {
        &self.storage.herd_file
    }

    pub fn max_page_size(&self) -> usize {
        self.pagination.max_page_size.unwrap_or(DEFAULT_MAX_PAGE_SIZE)
    }

    pub fn default_page_size(&self) -> usize {
        self.pagination
            .default_page_size
            .unwrap_or_else(|| self.max_page_size())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl PaginationSettings for HerdConfig {
    fn max_page_size(&self) -> usize {
        self.max_page_size()
    }

    fn default_page_size(&self) -> usize {
        self.default_page_size()
    }
}

impl Validate for HerdConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[pagination]
max_page_size = 20
default_page_size = 5

[storage]
herd_file = "./data/herd.csv"

[logging]
level = "debug"
json = true
"#;

        let config = HerdConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.herd_file(), "./data/herd.csv");
        assert_eq!(config.max_page_size(), 20);
        assert_eq!(config.default_page_size(), 5);
        assert_eq!(config.log_level(), "debug");
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = HerdConfig::from_toml_str("[storage]\nherd_file = \"herd.json\"\n").unwrap();

        assert_eq!(config.max_page_size(), 50);
        assert_eq!(config.default_page_size(), 50);
        assert_eq!(config.log_level(), "info");
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HERDBOOK_TEST_HERD_FILE", "/srv/herd.csv");

        let toml_content = r#"
[storage]
herd_file = "${HERDBOOK_TEST_HERD_FILE}"
"#;

        let config = HerdConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.herd_file(), "/srv/herd.csv");

        std::env::remove_var("HERDBOOK_TEST_HERD_FILE");
    }

    #[test]
    fn test_config_validation() {
        let bad_extension = HerdConfig::for_herd_file("herd.txt");
        assert!(bad_extension.validate().is_err());

        let mut zero_ceiling = HerdConfig::for_herd_file("herd.csv");
        zero_ceiling.pagination.max_page_size = Some(0);
        assert!(zero_ceiling.validate().is_err());

        let mut default_above_ceiling = HerdConfig::for_herd_file("herd.csv");
        default_above_ceiling.pagination.max_page_size = Some(10);
        default_above_ceiling.pagination.default_page_size = Some(11);
        assert!(default_above_ceiling.validate().is_err());

        let mut bad_level = HerdConfig::for_herd_file("herd.csv");
        bad_level.logging = Some(LoggingConfig {
            level: Some("loud".to_string()),
            json: None,
        });
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = HerdConfig::from_toml_str("[storage\nherd_file = 1").unwrap_err();
        assert!(matches!(err, HerdError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\nherd_file = \"herd.csv\"\n\n[pagination]\nmax_page_size = 7\n")
            .unwrap();

        let config = HerdConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.max_page_size(), 7);
    }
}
