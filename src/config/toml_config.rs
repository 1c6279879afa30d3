use crate::adapters::plot::{MAX_SCALE, MIN_SCALE};
use crate::config::validate_output_files;
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFiles, OutputFormat, SetInput, SortBy};
use crate::input::read_items_file;
use crate::utils::error::{Result, UpsetError};
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub output: OutputConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
    #[serde(skip)]
    resolved_sets: Vec<SetInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
    #[serde(default)]
    pub bundle: bool,
    #[serde(default)]
    pub filenames: OutputFiles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            sort_by: SortBy::default(),
        }
    }
}

/// A `[[sets]]` entry. Items may be listed inline, read from a file, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEntry {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub items_file: Option<String>,
}

fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Csv, OutputFormat::Png]
}

fn default_scale() -> u32 {
    2
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置，items_file 以設定檔所在目錄為基準
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(UpsetError::IoError)?;
        let mut config = Self::parse(&content)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_sets(base_dir)?;
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config = Self::parse(content)?;
        config.resolve_sets(Path::new("."))?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UpsetError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UpsetError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn resolve_sets(&mut self, base_dir: &Path) -> Result<()> {
        let mut resolved = Vec::with_capacity(self.sets.len());
        for entry in &self.sets {
            let mut items = entry.items.clone();
            if let Some(file) = &entry.items_file {
                let path = base_dir.join(file);
                tracing::debug!("Reading items for '{}' from {}", entry.name, path.display());
                items.extend(read_items_file(&path)?);
            }
            resolved.push(SetInput {
                name: entry.name.clone(),
                items,
            });
        }
        self.resolved_sets = resolved;
        Ok(())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("output.path", &self.output.path)?;
        validate_non_empty_list("output.formats", &self.output.formats)?;
        validate_range("plot.scale", self.plot.scale, MIN_SCALE, MAX_SCALE)?;
        validate_output_files(&self.output.filenames)?;
        validate_non_empty_list("sets", &self.sets)?;

        for entry in &self.sets {
            validate_non_empty_string("sets.name", &entry.name)?;
            if let Some(file) = &entry.items_file {
                validate_path("sets.items_file", file)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn sets(&self) -> &[SetInput] {
        &self.resolved_sets
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output.formats
    }

    fn output_files(&self) -> &OutputFiles {
        &self.output.filenames
    }

    fn sort_by(&self) -> SortBy {
        self.plot.sort_by
    }

    fn plot_scale(&self) -> u32 {
        self.plot.scale
    }

    fn bundle(&self) -> bool {
        self.output.bundle
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
