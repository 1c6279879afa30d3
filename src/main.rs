use clap::Parser;
use std::io;
use upset_matrix::adapters::text_plot::render_text;
use upset_matrix::input::FormPrompt;
use upset_matrix::utils::{logger, validation::Validate};
use upset_matrix::{CliConfig, LocalStorage, UpsetEngine, UpsetError, UpsetPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting upset-matrix CLI");
    if config.verbose {
        tracing::debug!("CLI config: {}", serde_json::to_string(&config)?);
    }

    // 互動模式：以終端機問答取代表單
    if config.interactive {
        let stdin = io::stdin();
        match FormPrompt::new(stdin.lock(), io::stdout()).collect() {
            Ok(sets) => config.sets = sets,
            Err(e) => exit_with(&e),
        }
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let show = config.show;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = UpsetPipeline::new(storage, config);
    let engine = UpsetEngine::new(pipeline);

    match engine.run().await {
        Ok(output) => {
            if show {
                println!("{}", render_text(&output.result.summary, 40));
            }
            tracing::info!("✅ UpSet run completed successfully!");
            for path in &output.outputs {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn exit_with(e: &UpsetError) -> ! {
    tracing::error!(
        "❌ UpSet run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}
