use crate::adapters::export::{bundle_zip, summary_json, to_delimited};
use crate::adapters::plot::{render_png, PlotStyle};
use crate::core::intersections::summarize;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{IncidenceMatrix, OutputFormat, SetCollection, UpsetResult};
use crate::utils::error::{Result, UpsetError};
use std::path::Path;

pub struct UpsetPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> UpsetPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn render(&self, format: OutputFormat, result: &UpsetResult) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Csv => to_delimited(&result.matrix, b','),
            OutputFormat::Tsv => to_delimited(&result.matrix, b'\t'),
            OutputFormat::Json => summary_json(&result.summary),
            OutputFormat::Png => {
                let style = PlotStyle {
                    scale: self.config.plot_scale(),
                };
                render_png(&result.summary, &style)
            }
        }
    }

    fn output_location(&self, file_name: &str) -> String {
        Path::new(self.config.output_path())
            .join(file_name)
            .display()
            .to_string()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for UpsetPipeline<S, C> {
    async fn extract(&self) -> Result<SetCollection> {
        tracing::debug!("Validating {} set inputs", self.config.sets().len());
        let sets = SetCollection::from_inputs(self.config.sets())?;

        for (name, items) in sets.iter() {
            tracing::debug!("Set '{}' has {} items", name, items.len());
        }

        Ok(sets)
    }

    async fn transform(&self, sets: SetCollection) -> Result<UpsetResult> {
        let matrix = IncidenceMatrix::derive(&sets);
        let summary = summarize(&matrix, self.config.sort_by());

        tracing::debug!(
            "Found {} distinct intersections over {} items",
            summary.intersections.len(),
            summary.item_count
        );

        Ok(UpsetResult { matrix, summary })
    }

    async fn load(&self, result: &UpsetResult) -> Result<Vec<String>> {
        if result.matrix.is_empty() {
            return Err(UpsetError::NoData {
                action: "save".to_string(),
            });
        }

        let files = self.config.output_files();
        let mut rendered: Vec<(String, Vec<u8>)> = Vec::new();
        for format in self.config.output_formats() {
            let name = files.for_format(*format).to_string();
            if rendered.iter().any(|(existing, _)| *existing == name) {
                tracing::warn!("Skipping duplicate output {}", name);
                continue;
            }
            let data = self.render(*format, result)?;
            tracing::debug!("Rendered {} ({} bytes)", name, data.len());
            rendered.push((name, data));
        }

        if self.config.bundle() {
            let zip_data = bundle_zip(&rendered)?;
            tracing::debug!(
                "Writing ZIP file with {} entries ({} bytes)",
                rendered.len(),
                zip_data.len()
            );
            self.storage.write_file(&files.zip, &zip_data).await?;
            return Ok(vec![self.output_location(&files.zip)]);
        }

        let mut outputs = Vec::with_capacity(rendered.len());
        for (name, data) in &rendered {
            self.storage.write_file(name, data).await?;
            outputs.push(self.output_location(name));
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{OutputFiles, SetInput, SortBy};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                UpsetError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        sets: Vec<SetInput>,
        formats: Vec<OutputFormat>,
        files: OutputFiles,
        bundle: bool,
    }

    impl MockConfig {
        fn new(sets: Vec<SetInput>) -> Self {
            Self {
                sets,
                formats: vec![OutputFormat::Csv, OutputFormat::Png],
                files: OutputFiles::default(),
                bundle: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn output_path(&self) -> &str {
            "test_output"
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
            SortBy::Cardinality
        }

        fn plot_scale(&self) -> u32 {
            1
        }

        fn bundle(&self) -> bool {
            self.bundle
        }
    }

    fn two_sets() -> Vec<SetInput> {
        vec![SetInput::new("A", ["x", "y"]), SetInput::new("B", ["y", "z"])]
    }

    #[tokio::test]
    async fn test_extract_validates_sets() {
        let pipeline = UpsetPipeline::new(MockStorage::new(), MockConfig::new(two_sets()));

        let sets = pipeline.extract().await.unwrap();

        assert_eq!(sets.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_set() {
        let config = MockConfig::new(vec![SetInput::new("A", ["x"]), SetInput::new("B", [""])]);
        let pipeline = UpsetPipeline::new(MockStorage::new(), config);

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, UpsetError::EmptySet { ref name } if name == "B"));
    }

    #[tokio::test]
    async fn test_extract_rejects_missing_sets() {
        let pipeline = UpsetPipeline::new(MockStorage::new(), MockConfig::new(vec![]));

        assert!(matches!(pipeline.extract().await, Err(UpsetError::NoSets)));
    }

    #[tokio::test]
    async fn test_transform_builds_matrix_and_summary() {
        let pipeline = UpsetPipeline::new(MockStorage::new(), MockConfig::new(two_sets()));
        let sets = pipeline.extract().await.unwrap();

        let result = pipeline.transform(sets).await.unwrap();

        assert_eq!(result.matrix.row_count(), 3);
        assert_eq!(result.summary.intersections.len(), 3);
        assert_eq!(result.summary.set_sizes, vec![2, 2]);
    }

    #[tokio::test]
    async fn test_load_writes_each_format() {
        let storage = MockStorage::new();
        let pipeline = UpsetPipeline::new(storage.clone(), MockConfig::new(two_sets()));
        let sets = pipeline.extract().await.unwrap();
        let result = pipeline.transform(sets).await.unwrap();

        let outputs = pipeline.load(&result).await.unwrap();

        assert_eq!(
            outputs,
            vec![
                Path::new("test_output").join("upset_matrix.csv").display().to_string(),
                Path::new("test_output").join("upset_plot.png").display().to_string(),
            ]
        );
        let csv = storage.get_file("upset_matrix.csv").await.unwrap();
        assert_eq!(csv, b",A,B\nx,1,0\ny,1,1\nz,0,1\n");
        let png = storage.get_file("upset_plot.png").await.unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[tokio::test]
    async fn test_load_bundles_into_zip() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(two_sets());
        config.formats = vec![OutputFormat::Csv, OutputFormat::Tsv, OutputFormat::Json];
        config.bundle = true;
        let pipeline = UpsetPipeline::new(storage.clone(), config);
        let sets = pipeline.extract().await.unwrap();
        let result = pipeline.transform(sets).await.unwrap();

        let outputs = pipeline.load(&result).await.unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(storage.file_names().await, vec!["upset_output.zip"]);

        let zip_bytes = storage.get_file("upset_output.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["upset_matrix.csv", "upset_matrix.tsv", "upset_summary.json"]
        );
    }

    #[tokio::test]
    async fn test_load_skips_duplicate_formats() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(two_sets());
        config.formats = vec![OutputFormat::Csv, OutputFormat::Csv];
        let pipeline = UpsetPipeline::new(storage.clone(), config);
        let result = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();

        let outputs = pipeline.load(&result).await.unwrap();

        assert_eq!(outputs.len(), 1);
    }

    #[tokio::test]
    async fn test_load_without_data_fails() {
        let pipeline = UpsetPipeline::new(MockStorage::new(), MockConfig::new(two_sets()));
        let empty = UpsetResult {
            matrix: IncidenceMatrix::default(),
            summary: summarize(&IncidenceMatrix::default(), SortBy::Cardinality),
        };

        let err = pipeline.load(&empty).await.unwrap_err();

        assert!(matches!(err, UpsetError::NoData { .. }));
    }
}
