use clap::Parser;
use record_cleaner::adapters::export;
use record_cleaner::core::ConfigProvider;
use record_cleaner::utils::error::{CleanerError, ErrorSeverity};
use record_cleaner::utils::{logger, validation::Validate};
use record_cleaner::{CleaningEngine, CleaningPipeline, CliConfig, LocalStorage, RunSummary, TomlConfig};

fn exit_code(e: &CleanerError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(context: &str, e: &CleanerError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

fn print_summary(summary: &RunSummary) {
    let report = &summary.report;
    println!("✅ Cleaning completed");
    println!("   Original records:   {}", report.original);
    println!("   Cleaned records:    {}", report.cleaned);
    println!("   Duplicates removed: {}", report.duplicates_removed);
    println!("   Missing fixed:      {}", report.missing_fixed);
    println!("   Invalid emails:     {}", report.invalid_emails);
    if let Some(insights) = &report.ai_insights {
        println!("🤖 {}", insights);
    }
    println!("📁 Output saved to: {}", summary.output_path);

    if !summary.preview.is_empty() {
        match export::to_csv(&summary.preview) {
            Ok(table) => {
                println!("👀 First {} records:", summary.preview.len());
                print!("{}", table);
            }
            Err(e) => tracing::warn!("⚠️ Could not render preview: {}", e),
        }
    }
}

async fn run<C: ConfigProvider + Validate>(
    config: C,
    monitor: bool,
    preview: usize,
) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        fail("Configuration validation failed", &e);
    }

    let pipeline = CleaningPipeline::new(LocalStorage::default(), config);
    let engine = CleaningEngine::new_with_monitoring(pipeline, monitor).with_preview(preview);

    match engine.run().await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) if exit_code(&e) == 0 => {
            tracing::warn!("⚠️ Finished with a warning: {}", e);
            Ok(())
        }
        Err(e) => fail("Cleaning run failed", &e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting record-cleaner");

    let preview = cli.preview.unwrap_or(0);

    match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => fail(&format!("Failed to load config file '{}'", path), &e),
            };
            cli.apply_overrides(&mut config);
            let monitor = config.monitoring_enabled();
            run(config, monitor, preview).await
        }
        None => {
            let monitor = cli.monitor;
            run(cli, monitor, preview).await
        }
    }
}
