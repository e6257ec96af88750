use crate::adapters::notion::{transform_page, QueryRequest, QueryResponse};
use crate::config::NotionConfig;
use crate::domain::model::ProjectPage;
use crate::domain::ports::ProjectRepository;
use crate::utils::error::{NotionError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const NOTION_VERSION_HEADER: &str = "Notion-Version";

/// 以 Notion 資料庫作為來源的專案查詢
pub struct NotionProjectRepository {
    config: NotionConfig,
    client: Client,
}

impl NotionProjectRepository {
    pub fn new(config: NotionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: NotionConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &NotionConfig {
        &self.config
    }

    async fn query_page(
        &self,
        url: &Url,
        token: &str,
        cursor: Option<String>,
    ) -> Result<QueryResponse> {
        let body = QueryRequest::by_year_descending()
            .with_cursor(cursor)
            .with_page_size(self.config.page_size);

        tracing::debug!("Making Notion query request to: {}", url);
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .header(NOTION_VERSION_HEADER, &self.config.notion_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Notion response status: {}", status);

        if !status.is_success() {
            // 錯誤內容讀不到時仍回報狀態碼
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ Notion API error: {} {}", status.as_u16(), body);
            return Err(NotionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let json: serde_json::Value = serde_json::from_str(&text)?;
        QueryResponse::deserialize(&json).map_err(|e| NotionError::Payload {
            message: format!("query response does not match the expected shape: {}", e),
        })
    }
}

#[async_trait::async_trait]
impl ProjectRepository for NotionProjectRepository {
    async fn query_projects(&self) -> Result<ProjectPage> {
        let (token, database_id) = self.config.credentials()?;
        let url = self.config.query_url(database_id)?;

        tracing::info!("📡 Querying Notion database {}", database_id);

        let mut page = ProjectPage::default();
        let mut cursor = None;
        let mut pages_fetched = 0usize;

        loop {
            let response = self.query_page(&url, token, cursor.take()).await?;
            pages_fetched += 1;

            page.projects.extend(response.results.iter().map(transform_page));
            page.has_more = response.has_more;
            page.next_cursor = response.next_cursor;

            if !page.has_more {
                break;
            }
            if !self.config.paginate {
                tracing::warn!(
                    "⚠️ Notion reported more results but pagination is disabled; only the first {} projects were returned",
                    page.projects.len()
                );
                break;
            }
            let Some(next) = page.next_cursor.clone() else {
                tracing::warn!("⚠️ Notion reported has_more without a next_cursor; stopping");
                break;
            };
            if pages_fetched >= self.config.max_pages {
                tracing::warn!(
                    "⚠️ Stopped after {} pages with more results remaining",
                    pages_fetched
                );
                break;
            }
            cursor = Some(next);
        }

        tracing::info!(
            "✅ Fetched {} projects from Notion ({} page(s))",
            page.projects.len(),
            pages_fetched
        );
        Ok(page)
    }
}
