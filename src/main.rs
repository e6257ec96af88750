use clap::Parser;
use notion_projects::core::export;
use notion_projects::utils::error::{ErrorSeverity, NotionError};
use notion_projects::utils::logger::{init_logger, LogFormat};
use notion_projects::utils::validation::Validate;
use notion_projects::{
    CliConfig, LocalStorage, NotionProjectRepository, ProjectExporter, ProjectRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    init_logger(LogFormat::from_json_flag(cli.json_logs), cli.verbose);

    tracing::info!("🚀 Starting notion-projects");

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    if cli.verbose {
        tracing::debug!(
            "Notion base URL: {}, paginate: {}, export: {:?}",
            settings.notion.base_url,
            settings.notion.paginate,
            settings.export
        );
    }

    let format = settings.export.export_format()?;
    let repository = NotionProjectRepository::new(settings.notion.clone())?;

    let page = match repository.query_projects().await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(
                "❌ Fetching projects failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            fail(&e);
        }
    };

    if cli.stdout {
        println!("{}", export::render(&page.projects, format)?);
        return Ok(());
    }

    let storage = LocalStorage::new(settings.export.output_path.clone());
    let exporter = ProjectExporter::new(storage, format, settings.export.file_stem.clone());

    match exporter.export(&page.projects).await {
        Ok(path) => {
            println!("✅ Exported {} projects", page.projects.len());
            println!("📁 Output saved to: {}", path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &NotionError) -> ! {
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
