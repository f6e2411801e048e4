use clap::Parser;
use herdbook::utils::error::ErrorSeverity;
use herdbook::utils::logger;
use herdbook::{
    AnimalId, CliConfig, Command, HerdConfig, HerdError, HerdFile, HerdService, PageRequest,
    Paginator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let level = cli.effective_log_level(&config);
    if cli.json_logs || config.json_logs() {
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(level);
    }

    tracing::info!("🐄 Starting herdbook");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = run(&cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(command: &Command, config: &HerdConfig) -> Result<(), HerdError> {
    let herd = HerdFile::new(config.herd_file())?.load_into_memory().await?;
    let service = HerdService::with_paginator(herd, Paginator::from_settings(config)?);

    let output = match command {
        Command::List {
            page,
            page_size,
            sex,
        } => {
            let request = PageRequest {
                page_number: *page,
                page_size: *page_size,
            };
            let view = match sex {
                Some(sex) => service.list_paged_by_sex(*sex, &request).await?,
                None => service.list_paged(&request).await?,
            };
            tracing::info!(
                "📄 Page {}/{} ({} of {} animals)",
                view.current_page,
                view.total_pages,
                view.len(),
                view.total_count
            );
            serde_json::to_string_pretty(&view)?
        }
        Command::Show { id } => {
            let animal = service.get(AnimalId::try_new(*id)?).await?;
            serde_json::to_string_pretty(&animal)?
        }
        Command::Lineage { id } => {
            let lineage = service.lineage(AnimalId::try_new(*id)?).await?;
            serde_json::to_string_pretty(&lineage)?
        }
    };

    println!("{}", output);
    Ok(())
}
