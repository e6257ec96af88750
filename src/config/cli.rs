use crate::config::toml_config::TomlConfig;
use crate::config::NotionConfig;
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "notion-projects")]
#[command(about = "Fetch portfolio projects from a Notion database and export them")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Notion integration token (overrides NOTION_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Notion database id (overrides NOTION_DATABASE_ID)
    #[arg(long)]
    pub database_id: Option<String>,

    /// Notion API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Follow `next_cursor` until every page has been fetched
    #[arg(long, conflicts_with = "no_paginate")]
    pub paginate: bool,

    /// Fetch only the first page, even when the config file enables pagination
    #[arg(long)]
    pub no_paginate: bool,

    /// Upper bound on pages fetched when paginating
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Export format: json or csv
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output directory for the exported file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print the export to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 合併設定來源，優先順序：命令列 > TOML 檔案 > 環境變數
    pub fn resolve(&self) -> Result<TomlConfig> {
        let env = NotionConfig::from_env();

        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file_over(path, env)?,
            None => TomlConfig {
                notion: env,
                ..TomlConfig::default()
            },
        };

        if let Some(token) = &self.token {
            settings.notion.token = Some(token.clone());
        }
        if let Some(database_id) = &self.database_id {
            settings.notion.database_id = Some(database_id.clone());
        }
        if let Some(base_url) = &self.base_url {
            settings.notion.base_url = base_url.clone();
        }
        if self.paginate {
            settings.notion.paginate = true;
        }
        if self.no_paginate {
            settings.notion.paginate = false;
        }
        if let Some(max_pages) = self.max_pages {
            settings.notion.max_pages = max_pages;
        }
        if let Some(format) = &self.format {
            settings.export.format = format.clone();
        }
        if let Some(output) = &self.output {
            settings.export.output_path = output.clone();
        }

        Ok(settings)
    }
}
