pub mod toml_config;

use crate::adapters::plot::{MAX_SCALE, MIN_SCALE};
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFiles, OutputFormat, SetInput, SortBy};
use crate::input::set_arg_value_parser;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_list, validate_path, validate_range, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "upset-matrix")]
#[command(about = "Build a set membership matrix and UpSet plot from named sets")]
pub struct CliConfig {
    /// A set as NAME=a,b,c or NAME=@items.txt (repeatable)
    #[arg(long = "set", value_name = "NAME=ITEMS", value_parser = set_arg_value_parser)]
    pub sets: Vec<SetInput>,

    #[arg(short, long, help = "Prompt for sets on the terminal")]
    pub interactive: bool,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = vec![OutputFormat::Csv, OutputFormat::Png]
    )]
    pub formats: Vec<OutputFormat>,

    #[arg(long, value_enum, default_value_t = SortBy::Degree)]
    pub sort_by: SortBy,

    #[arg(long, default_value_t = 2, help = "Plot scale factor (1-8)")]
    pub scale: u32,

    #[arg(long, help = "Write all outputs into one ZIP archive")]
    pub bundle: bool,

    #[arg(long, help = "Print the UpSet plot to the terminal")]
    pub show: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(skip)]
    #[serde(default)]
    pub files: OutputFiles,
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn sets(&self) -> &[SetInput] {
        &self.sets
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    fn output_files(&self) -> &OutputFiles {
        &self.files
    }

    fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    fn plot_scale(&self) -> u32 {
        self.scale
    }

    fn bundle(&self) -> bool {
        self.bundle
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_list("formats", &self.formats)?;
        validate_range("scale", self.scale, MIN_SCALE, MAX_SCALE)?;
        validate_output_files(&self.files)
    }
}

/// 檢查每個輸出檔名的副檔名
pub fn validate_output_files(files: &OutputFiles) -> Result<()> {
    for format in [
        OutputFormat::Csv,
        OutputFormat::Tsv,
        OutputFormat::Json,
        OutputFormat::Png,
    ] {
        validate_file_extension(
            &format!("filenames.{}", format.extension()),
            files.for_format(format),
            &[format.extension()],
        )?;
    }
    validate_file_extension("filenames.zip", &files.zip, &["zip"])
}
