use crate::domain::model::{Project, ProjectPage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// 查詢專案，失敗時回傳具體的錯誤種類
    async fn query_projects(&self) -> Result<ProjectPage>;

    /// 永不失敗的版本：任何錯誤都記錄後回傳空列表
    async fn fetch_projects(&self) -> Vec<Project> {
        match self.query_projects().await {
            Ok(page) => page.projects,
            Err(e) => {
                tracing::error!(
                    "❌ Failed to fetch projects from Notion: {} (Category: {:?})",
                    e,
                    e.category()
                );
                Vec::new()
            }
        }
    }
}
