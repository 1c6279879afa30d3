use clap::Parser;
use upset_matrix::adapters::text_plot::render_text;
use upset_matrix::core::ConfigProvider;
use upset_matrix::utils::{logger, validation::Validate};
use upset_matrix::{LocalStorage, TomlConfig, UpsetEngine, UpsetPipeline};

#[derive(Parser)]
#[command(name = "toml-upset")]
#[command(about = "UpSet matrix generator with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "upset.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the plot scale from config
    #[arg(long)]
    scale: Option<u32>,

    /// Override bundling from config
    #[arg(long)]
    bundle: Option<bool>,

    /// Print the UpSet plot to the terminal
    #[arg(long)]
    show: bool,

    /// Dry run - show what would be written without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based UpSet run");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(scale) = args.scale {
        config.plot.scale = scale;
        tracing::info!("🔧 Plot scale overridden to: {}", scale);
    }
    if let Some(bundle) = args.bundle {
        config.output.bundle = bundle;
        tracing::info!("🔧 Bundling overridden to: {}", bundle);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = UpsetPipeline::new(storage, config);
    let engine = UpsetEngine::new(pipeline);

    match engine.run().await {
        Ok(output) => {
            if args.show {
                println!("{}", render_text(&output.result.summary, 40));
            }
            tracing::info!("✅ UpSet run completed successfully!");
            for path in &output.outputs {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
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
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    let formats: Vec<&str> = config
        .output_formats()
        .iter()
        .map(|format| format.extension())
        .collect();

    println!("📋 Configuration Summary:");
    println!("  Sets: {}", config.sets().len());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", formats.join(", "));
    println!("  Sort: {:?}", config.sort_by());
    println!("  Scale: {}", config.plot_scale());
    if config.bundle() {
        println!("  Bundle: {}", config.output_files().zip);
    }
    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📥 Sets:");
    for set in config.sets() {
        println!("  {} ({} items as entered)", set.name, set.items.len());
    }

    println!();
    println!("💾 Would write:");
    let files = config.output_files();
    if config.bundle() {
        println!("  {}", files.zip);
    }
    for format in config.output_formats() {
        let prefix = if config.bundle() { "    └ " } else { "  " };
        println!("{}{}", prefix, files.for_format(*format));
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
