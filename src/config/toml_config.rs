use crate::config::NotionConfig;
use crate::core::export::ExportFormat;
use crate::utils::error::{NotionError, Result};
use crate::utils::validation::{validate_non_blank, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const PLACEHOLDER: &str = r"\$\{([^}]+)\}";

/// 檔案與其他來源合併後的完整設定
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    pub notion: NotionConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Default, Deserialize)]
struct TomlFile {
    #[serde(default)]
    notion: NotionOverlay,
    #[serde(default)]
    export: ExportConfig,
}

/// `[notion]` 表格：只有檔案裡實際寫出的欄位會覆蓋底層設定
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotionOverlay {
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub base_url: Option<String>,
    pub notion_version: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub paginate: Option<bool>,
    pub max_pages: Option<usize>,
    pub page_size: Option<u32>,
}

impl NotionOverlay {
    /// 空白或仍是 `${VAR}` 的字串視同未設定，保留底層的值
    fn apply(self, mut base: NotionConfig, unresolved: &Regex) -> NotionConfig {
        let set = |value: Option<String>| {
            value.filter(|v| !v.trim().is_empty() && !unresolved.is_match(v.trim()))
        };

        if let Some(token) = set(self.token) {
            base.token = Some(token);
        }
        if let Some(database_id) = set(self.database_id) {
            base.database_id = Some(database_id);
        }
        if let Some(base_url) = set(self.base_url) {
            base.base_url = base_url;
        }
        if let Some(notion_version) = set(self.notion_version) {
            base.notion_version = notion_version;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            base.timeout_seconds = timeout_seconds;
        }
        if let Some(paginate) = self.paginate {
            base.paginate = paginate;
        }
        if let Some(max_pages) = self.max_pages {
            base.max_pages = max_pages;
        }
        if self.page_size.is_some() {
            base.page_size = self.page_size;
        }
        base
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
}

fn default_format() -> String {
    "json".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_file_stem() -> String {
    "projects".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_path: default_output_path(),
            file_stem: default_file_stem(),
        }
    }
}

impl ExportConfig {
    pub fn export_format(&self) -> Result<ExportFormat> {
        self.format.parse()
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置，未寫出的欄位使用預設值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_over(path, NotionConfig::default())
    }

    /// 從 TOML 檔案載入配置，疊加在 `base` 之上
    pub fn from_file_over<P: AsRef<Path>>(path: P, base: NotionConfig) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NotionError::Io)?;
        Self::from_toml_str_over(&content, base)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_over(content, NotionConfig::default())
    }

    pub fn from_toml_str_over(content: &str, base: NotionConfig) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let file: TomlFile =
            toml::from_str(&processed_content).map_err(|e| NotionError::ConfigValidation {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        let unresolved = placeholder_regex(&format!("^{}$", PLACEHOLDER))?;
        Ok(Self {
            notion: file.notion.apply(base, &unresolved),
            export: file.export,
        })
    }

    /// 替換環境變數 (例如 ${NOTION_TOKEN})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = placeholder_regex(PLACEHOLDER)?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

fn placeholder_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| NotionError::ConfigValidation {
        field: "env_substitution".to_string(),
        message: e.to_string(),
    })
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        self.export_format()?;
        validate_non_blank("export.output_path", &self.output_path)?;
        validate_non_blank("export.file_stem", &self.file_stem)?;
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.notion.validate()?;
        self.export.validate()
    }
}
