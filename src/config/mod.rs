#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    invalid, require_non_blank, validate_non_blank, validate_range, validate_url, Validate,
};
use std::env;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_PAGES: usize = 10;

pub const TOKEN_VAR: &str = "NOTION_TOKEN";
pub const DATABASE_ID_VAR: &str = "NOTION_DATABASE_ID";

/// Notion 連線設定。憑證缺少時不算設定錯誤，查詢時才會降級為空結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionConfig {
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub base_url: String,
    pub notion_version: String,
    pub timeout_seconds: u64,
    pub paginate: bool,
    pub max_pages: usize,
    pub page_size: Option<u32>,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            database_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            paginate: false,
            max_pages: DEFAULT_MAX_PAGES,
            page_size: None,
        }
    }
}

impl NotionConfig {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            database_id: Some(database_id.into()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_pagination(mut self, max_pages: usize) -> Self {
        self.paginate = true;
        self.max_pages = max_pages;
        self
    }

    /// 從環境變數載入，未設定的項目使用預設值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token: non_blank_var(TOKEN_VAR),
            database_id: non_blank_var(DATABASE_ID_VAR),
            base_url: non_blank_var("NOTION_API_BASE_URL").unwrap_or(defaults.base_url),
            notion_version: non_blank_var("NOTION_VERSION").unwrap_or(defaults.notion_version),
            timeout_seconds: non_blank_var("NOTION_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            paginate: non_blank_var("NOTION_PAGINATE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.paginate),
            max_pages: defaults.max_pages,
            page_size: defaults.page_size,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    /// 回傳 (token, database_id)，任一缺少即為 `MissingCredentials`
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let token = require_non_blank(TOKEN_VAR, &self.token)?;
        let database_id = require_non_blank(DATABASE_ID_VAR, &self.database_id)?;
        Ok((token, database_id))
    }

    /// `{base_url}/databases/{database_id}/query`，database id 以單一路徑片段編碼
    pub fn query_url(&self, database_id: &str) -> Result<Url> {
        let mut url = validate_url("notion.base_url", &self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| invalid("notion.base_url", &self.base_url, "URL cannot be a base"))?
            .pop_if_empty()
            .extend(["databases", database_id, "query"]);
        Ok(url)
    }
}

impl Validate for NotionConfig {
    fn validate(&self) -> Result<()> {
        validate_url("notion.base_url", &self.base_url)?;
        validate_non_blank("notion.notion_version", &self.notion_version)?;
        validate_range("notion.timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_range("notion.max_pages", self.max_pages, 1, 1000)?;
        if let Some(page_size) = self.page_size {
            validate_range("notion.page_size", page_size, 1, 100)?;
        }
        Ok(())
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NotionConfig::default();
        assert_eq!(config.base_url, "https://api.notion.com/v1");
        assert_eq!(config.notion_version, "2022-06-28");
        assert!(!config.paginate);
        assert!(!config.has_credentials());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_query_url_trims_trailing_slash() {
        let config = NotionConfig::new("secret", "db123").with_base_url("http://localhost:9000/v1/");
        assert_eq!(
            config.query_url("db123").unwrap().as_str(),
            "http://localhost:9000/v1/databases/db123/query"
        );

        let config = NotionConfig::new("secret", "db123").with_base_url("http://127.0.0.1:4010");
        assert_eq!(
            config.query_url("db123").unwrap().as_str(),
            "http://127.0.0.1:4010/databases/db123/query"
        );
    }

    #[test]
    fn test_query_url_encodes_database_id() {
        let config = NotionConfig::default();
        let url = config.query_url("../pages/abc?filter=1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.notion.com/v1/databases/..%2Fpages%2Fabc%3Ffilter=1/query"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_query_url_rejects_invalid_base() {
        let config = NotionConfig::default().with_base_url("not a url");
        assert!(config.query_url("db123").is_err());
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let config = NotionConfig::new("secret", "  ");
        assert!(!config.has_credentials());
        assert!(NotionConfig::new("secret", "db123").has_credentials());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = NotionConfig::default();
        config.page_size = Some(500);
        assert!(config.validate().is_err());

        let mut config = NotionConfig::default();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let config = NotionConfig::default().with_base_url("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
    }
}
