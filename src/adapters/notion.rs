//! Notion 資料庫查詢的請求/回應格式，以及屬性欄位的攤平規則。
//!
//! 頁面層級（`results`、`id`）嚴格解析；個別屬性則逐欄寬鬆解析，
//! 格式不符的屬性視同缺少並使用預設值。

use crate::domain::model::Project;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub const SORT_PROPERTY: &str = "Year";
pub const SORT_DIRECTION: &str = "descending";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuerySort {
    pub property: &'static str,
    pub direction: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub sorts: Vec<QuerySort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl QueryRequest {
    pub fn by_year_descending() -> Self {
        Self {
            sorts: vec![QuerySort {
                property: SORT_PROPERTY,
                direction: SORT_DIRECTION,
            }],
            start_cursor: None,
            page_size: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.start_cursor = cursor;
        self
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<NotionPage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TitleProperty {
    title: Option<Vec<RichText>>,
}

#[derive(Debug, Deserialize)]
struct RichTextProperty {
    rich_text: Option<Vec<RichText>>,
}

#[derive(Debug, Deserialize)]
struct MultiSelectProperty {
    multi_select: Option<Vec<SelectOption>>,
}

#[derive(Debug, Deserialize)]
struct NumberProperty {
    number: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct UrlProperty {
    url: Option<String>,
}

/// 串接所有片段的純文字
pub fn rich_text(items: Option<&[RichText]>) -> String {
    match items {
        Some(items) if !items.is_empty() => items.iter().map(|t| t.plain_text.as_str()).collect(),
        _ => String::new(),
    }
}

/// 依原順序取出標籤名稱
pub fn multi_select(items: Option<&[SelectOption]>) -> Vec<String> {
    match items {
        Some(items) => items.iter().map(|s| s.name.clone()).collect(),
        None => Vec::new(),
    }
}

/// 只接受可無損轉成整數的數字，例如 2019 或 2019.0
pub fn integer(number: Option<&Number>) -> Option<i64> {
    let number = number?;
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    let value = number.as_f64()?;
    if value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}

fn property<T: DeserializeOwned>(page_id: &str, props: &Map<String, Value>, key: &str) -> Option<T> {
    let value = props.get(key)?;
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!("Ignoring malformed property '{}' on page {}: {}", key, page_id, e);
            None
        }
    }
}

pub fn transform_page(page: &NotionPage) -> Project {
    let empty = Map::new();
    let props = page.properties.as_ref().unwrap_or(&empty);
    let id = page.id.as_str();

    let title_of = |key: &str| {
        property::<TitleProperty>(id, props, key)
            .map(|p| rich_text(p.title.as_deref()))
            .unwrap_or_default()
    };
    let text_of = |key: &str| {
        property::<RichTextProperty>(id, props, key)
            .map(|p| rich_text(p.rich_text.as_deref()))
            .unwrap_or_default()
    };
    let tags_of = |key: &str| {
        property::<MultiSelectProperty>(id, props, key)
            .map(|p| multi_select(p.multi_select.as_deref()))
            .unwrap_or_default()
    };

    Project {
        id: page.id.clone(),
        name: title_of("Name"),
        description: text_of("Description"),
        agency: text_of("Agency"),
        client: text_of("Client"),
        roles: tags_of("Roles"),
        technologies: tags_of("Technologies"),
        year: property::<NumberProperty>(id, props, "Year").and_then(|p| integer(p.number.as_ref())),
        url: property::<UrlProperty>(id, props, "Link")
            .and_then(|p| p.url)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(value: Value) -> NotionPage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(QueryRequest::by_year_descending()).unwrap();
        assert_eq!(
            body,
            json!({"sorts": [{"property": "Year", "direction": "descending"}]})
        );

        let body = serde_json::to_value(
            QueryRequest::by_year_descending()
                .with_cursor(Some("cursor-2".to_string()))
                .with_page_size(Some(50)),
        )
        .unwrap();
        assert_eq!(body["start_cursor"], "cursor-2");
        assert_eq!(body["page_size"], 50);
    }

    #[test]
    fn test_rich_text_concatenates_spans() {
        let spans = vec![
            RichText { plain_text: "Diamond ".to_string() },
            RichText { plain_text: "Schmitt".to_string() },
        ];
        assert_eq!(rich_text(Some(spans.as_slice())), "Diamond Schmitt");
        assert_eq!(rich_text(Some(&spans[..0])), "");
        assert_eq!(rich_text(None), "");
    }

    #[test]
    fn test_multi_select_keeps_order() {
        let tags = vec![
            SelectOption { name: "WordPress".to_string() },
            SelectOption { name: "GSAP".to_string() },
        ];
        assert_eq!(multi_select(Some(tags.as_slice())), vec!["WordPress", "GSAP"]);
        assert!(multi_select(None).is_empty());
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(integer(Some(&Number::from(2019))), Some(2019));
        assert_eq!(integer(Number::from_f64(2019.0).as_ref()), Some(2019));
        assert_eq!(integer(Number::from_f64(2019.5).as_ref()), None);
        assert_eq!(integer(Some(&Number::from(u64::MAX))), None);
        assert_eq!(integer(None), None);
    }

    #[test]
    fn test_transform_full_page() {
        let page = page(json!({
            "id": "page-1",
            "properties": {
                "Name": {"id": "title", "type": "title", "title": [{"plain_text": "Frontier"}]},
                "Description": {"rich_text": [{"plain_text": "Agency website"}, {"plain_text": " with scroll effects."}]},
                "Agency": {"rich_text": [{"plain_text": "Frontier"}]},
                "Client": {"rich_text": [{"plain_text": "Frontier"}]},
                "Roles": {"multi_select": [{"id": "a", "name": "Development", "color": "blue"}]},
                "Technologies": {"multi_select": [{"name": "WordPress"}, {"name": "DrawSVG"}]},
                "Year": {"number": 2019},
                "Link": {"url": "https://frontier.is"}
            }
        }));

        let project = transform_page(&page);
        assert_eq!(project.id, "page-1");
        assert_eq!(project.name, "Frontier");
        assert_eq!(project.description, "Agency website with scroll effects.");
        assert_eq!(project.roles, vec!["Development"]);
        assert_eq!(project.technologies, vec!["WordPress", "DrawSVG"]);
        assert_eq!(project.year, Some(2019));
        assert_eq!(project.url, "https://frontier.is");
    }

    #[test]
    fn test_transform_missing_and_malformed_properties() {
        let page = page(json!({
            "id": "page-2",
            "properties": {
                "Name": {"title": null},
                "Year": {"rich_text": [{"plain_text": "2019"}]},
                "Link": {"url": null},
                "Technologies": "WordPress"
            }
        }));

        let project = transform_page(&page);
        assert_eq!(project.name, "");
        assert_eq!(project.description, "");
        assert!(project.technologies.is_empty());
        assert_eq!(project.year, None);
        assert_eq!(project.url, "");
    }

    #[test]
    fn test_transform_without_properties() {
        let project = transform_page(&page(json!({"id": "page-3"})));
        assert_eq!(project.id, "page-3");
        assert!(project.roles.is_empty());
    }
}
