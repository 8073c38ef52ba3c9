use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CmsError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_REFRESH_SECONDS: u64 = 30;
const MAX_TIMEOUT_SECONDS: u64 = 3_600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub menu_refresh: MenuRefreshConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub token: Option<String>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    pub name: Option<String>,
    #[serde(default = "default_navbar_location")]
    pub navbar_location: String,
    pub footer_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuRefreshConfig {
    pub interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
}

fn default_navbar_location() -> String {
    "navbar".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: None,
            navbar_location: default_navbar_location(),
            footer_location: None,
        }
    }
}

impl Default for MenuRefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: Some(DEFAULT_REFRESH_SECONDS),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            file_name: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
                token: None,
                headers: None,
            },
            site: SiteSection::default(),
            menu_refresh: MenuRefreshConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CmsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CMS_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            CmsError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_positive_number("api.timeout_seconds", timeout, 1)?;
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(CmsError::InvalidConfigValueError {
                    field: "api.timeout_seconds".to_string(),
                    value: timeout.to_string(),
                    reason: format!("Value must be at most {}", MAX_TIMEOUT_SECONDS),
                });
            }
        }

        // 未展開的 ${VAR} 代表環境變數沒有設定
        if let Some(token) = &self.api.token {
            if token.starts_with("${") {
                return Err(CmsError::MissingConfigError {
                    field: format!("api.token ({})", token),
                });
            }
        }

        validate_non_empty_string("site.navbar_location", &self.site.navbar_location)?;
        if let Some(footer) = &self.site.footer_location {
            validate_non_empty_string("site.footer_location", footer)?;
        }

        if let Some(interval) = self.menu_refresh.interval_seconds {
            validate_positive_number("menu_refresh.interval_seconds", interval, 1)?;
        }

        validate_path("export.output_path", &self.export.output_path)?;
        if let Some(file_name) = &self.export.file_name {
            validate_path("export.file_name", file_name)?;
        }

        if let Some(format) = &self.logging.format {
            validate_one_of("logging.format", format, &["compact", "json"])?;
        }

        Ok(())
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn api_headers(&self) -> HashMap<String, String> {
        self.api.headers.clone().unwrap_or_default()
    }

    pub fn menu_refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.menu_refresh
                .interval_seconds
                .unwrap_or(DEFAULT_REFRESH_SECONDS),
        )
    }

    pub fn export_file_name(&self) -> &str {
        self.export
            .file_name
            .as_deref()
            .unwrap_or(crate::core::export::DEFAULT_EXPORT_FILE)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }
}

impl ConfigProvider for SiteConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn navbar_location(&self) -> &str {
        &self.site.navbar_location
    }

    fn footer_location(&self) -> Option<&str> {
        self.site.footer_location.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
