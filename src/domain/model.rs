use serde::{Deserialize, Serialize};

/// 作品集中的一個專案，欄位已從 Notion 的屬性格式攤平
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub agency: String,
    pub client: String,
    pub roles: Vec<String>,
    pub technologies: Vec<String>,
    pub year: Option<i64>,
    pub url: String,
}

/// 一次查詢的結果，`has_more` / `next_cursor` 取自最後一頁
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}
