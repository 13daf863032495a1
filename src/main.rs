use anyhow::Context;
use clap::Parser;
use stellar_classify::core::ConfigProvider;
use stellar_classify::utils::error::ErrorSeverity;
use stellar_classify::utils::{logger, validation::Validate};
use stellar_classify::{
    CliConfig, HttpClassifier, LocalStorage, PredictionReport, ReportExporter, Session,
    StellarError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting stellar-classify");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Prediction service: {}", config.service_endpoint());

    let classifier = HttpClassifier::from_config(&config).unwrap_or_else(|e| exit_with(&e));

    let mut session = Session::new();
    session.set_inputs(cli.magnitude_input());
    session.set_extinction(cli.extinction_settings(&config));
    if cli.apparent {
        session.toggle_view();
    }

    if let Some(preview) = session.snapshot().preview {
        tracing::info!("Computed color indices: {}", preview);
    }

    let result = match session.submit(&classifier).await {
        Ok(Some(result)) => result,
        Ok(None) => anyhow::bail!("a prediction request is already pending"),
        Err(e) => exit_with(&e),
    };

    let report = PredictionReport::new(result, chrono::Utc::now(), session.snapshot().view);
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("serializing prediction result")?;
        println!("{}", json);
    } else {
        print!("{}", report.render_text());
    }

    if cli.report {
        let exporter = ReportExporter::new(
            LocalStorage::new(config.output_path()),
            LocalStorage::new("."),
            &config,
        );
        match exporter.export(&report).await {
            Ok(path) => println!("📁 Report saved to: {}", path),
            Err(e) => exit_with(&e),
        }
    }

    Ok(())
}

fn exit_with(e: &StellarError) -> ! {
    if e.is_validation() {
        tracing::warn!("Input rejected: {}", e);
    } else {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    }

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
