use clap::Parser;
use page_sections::core::Storage;
use page_sections::utils::error::ErrorSeverity;
use page_sections::utils::{logger, validation::Validate};
use page_sections::{
    CliConfig, HtmlDocument, LocalStorage, PageConfig, RenderError, RenderResult, SectionOutcome,
    TracingReporter,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting page-sections");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut page = match PageConfig::from_file(&cli.config) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = page.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if cli.dry_run {
        print_plan(&page);
        return Ok(());
    }

    let storage = LocalStorage::new(&cli.root);
    page.rebase_source(storage.root());

    match run(&storage, &page).await {
        Ok(outcomes) => {
            print_outcomes(&outcomes);
            println!("📁 Page written to: {}", page.page.output);
        }
        Err(e) => {
            tracing::error!("❌ Page render failed: {} (Severity: {:?})", e, e.severity());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(storage: &LocalStorage, page: &PageConfig) -> page_sections::Result<Vec<SectionOutcome>> {
    let bytes = storage.read_file(&page.page.input).await?;
    let html = String::from_utf8(bytes).map_err(|e| {
        RenderError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;

    let document = Arc::new(HtmlDocument::new(html));
    let initializer = page.initializer(document.clone(), Arc::new(TracingReporter))?;
    let outcomes = initializer.initialize().await;

    storage
        .write_file(&page.page.output, document.html().as_bytes())
        .await?;
    Ok(outcomes)
}

fn print_plan(page: &PageConfig) {
    println!("🔍 Page '{}': {} -> {}", page.page.name, page.page.input, page.page.output);
    println!("   Data from: {}", page.source.base);
    for section in &page.sections {
        println!(
            "   #{} <- {} ({})",
            section.mount, section.source, section.template
        );
    }
}

fn print_outcomes(outcomes: &[SectionOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            RenderResult::Rendered(0) => println!("⚪ #{}: empty", outcome.mount_id),
            RenderResult::Rendered(count) => {
                println!("✅ #{}: {} items", outcome.mount_id, count)
            }
            RenderResult::Failed(reason) => println!("❌ #{}: {}", outcome.mount_id, reason),
            RenderResult::Skipped => println!("➖ #{}: not on page", outcome.mount_id),
        }
    }
}
