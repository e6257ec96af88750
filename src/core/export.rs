use crate::domain::model::Project;
use crate::domain::ports::Storage;
use crate::utils::error::{NotionError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::str::FromStr;

pub const CSV_HEADER: [&str; 9] = [
    "id",
    "name",
    "description",
    "agency",
    "client",
    "roles",
    "technologies",
    "year",
    "url",
];

const TAG_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = NotionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(NotionError::InvalidConfigValue {
                field: "export.format".to_string(),
                value: s.to_string(),
                reason: "Unsupported format. Valid formats: json, csv".to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectExport<'a> {
    fetched_at: String,
    count: usize,
    projects: &'a [Project],
}

pub fn render_json(projects: &[Project], fetched_at: DateTime<Utc>) -> Result<String> {
    let export = ProjectExport {
        fetched_at: fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        count: projects.len(),
        projects,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

pub fn render_csv(projects: &[Project]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for project in projects {
        let year = project.year.map(|y| y.to_string()).unwrap_or_default();
        writer.write_record([
            project.id.as_str(),
            project.name.as_str(),
            project.description.as_str(),
            project.agency.as_str(),
            project.client.as_str(),
            project.roles.join(TAG_SEPARATOR).as_str(),
            project.technologies.join(TAG_SEPARATOR).as_str(),
            year.as_str(),
            project.url.as_str(),
        ])?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| NotionError::Io(e.into_error()))?;
    String::from_utf8(data).map_err(|e| NotionError::Payload {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn render(projects: &[Project], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => render_json(projects, Utc::now()),
        ExportFormat::Csv => render_csv(projects),
    }
}

/// 把專案列表輸出到儲存位置
pub struct ProjectExporter<S: Storage> {
    storage: S,
    format: ExportFormat,
    file_stem: String,
}

impl<S: Storage> ProjectExporter<S> {
    pub fn new(storage: S, format: ExportFormat, file_stem: impl Into<String>) -> Self {
        Self {
            storage,
            format,
            file_stem: file_stem.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem, self.format.extension())
    }

    pub async fn export(&self, projects: &[Project]) -> Result<String> {
        let content = render(projects, self.format)?;
        let file_name = self.file_name();

        tracing::debug!("Writing {} ({} bytes) to storage", file_name, content.len());
        let path = self.storage.write_file(&file_name, content.as_bytes()).await?;
        tracing::info!("📁 Exported {} projects to {}", projects.len(), path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Vec<Project> {
        vec![
            Project {
                id: "p1".to_string(),
                name: "Willful.co".to_string(),
                description: "Marketing website, online wills".to_string(),
                agency: "Freelance".to_string(),
                client: "Willful".to_string(),
                roles: vec!["Development".to_string()],
                technologies: vec!["Webflow".to_string(), "CMS".to_string()],
                year: Some(2020),
                url: "https://willful.co".to_string(),
            },
            Project {
                id: "p2".to_string(),
                name: "Untitled".to_string(),
                description: String::new(),
                agency: String::new(),
                client: String::new(),
                roles: vec![],
                technologies: vec![],
                year: None,
                url: String::new(),
            },
        ]
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(" csv ".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_render_json_envelope() {
        let fetched_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let output = render_json(&sample(), fetched_at).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["fetched_at"], "2024-05-01T12:00:00Z");
        assert_eq!(value["count"], 2);
        assert_eq!(value["projects"][0]["technologies"][1], "CMS");
        assert!(value["projects"][1]["year"].is_null());
    }

    #[test]
    fn test_render_csv_rows() {
        let output = render_csv(&sample()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "id,name,description,agency,client,roles,technologies,year,url");
        assert_eq!(
            lines[1],
            "p1,Willful.co,\"Marketing website, online wills\",Freelance,Willful,Development,Webflow; CMS,2020,https://willful.co"
        );
        assert_eq!(lines[2], "p2,Untitled,,,,,,,");
    }
}
