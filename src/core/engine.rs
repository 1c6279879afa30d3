use crate::core::Pipeline;
use crate::domain::model::UpsetResult;
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub result: UpsetResult,
    pub outputs: Vec<String>,
}

pub struct UpsetEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> UpsetEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EngineOutput> {
        let started = Instant::now();
        tracing::info!("Starting UpSet run");

        // Extract
        let sets = self.pipeline.extract().await?;
        tracing::info!("📥 Validated {} sets", sets.len());

        // Transform
        let result = self.pipeline.transform(sets).await?;
        tracing::info!(
            "🔄 Built {}x{} matrix with {} intersections",
            result.matrix.row_count(),
            result.matrix.column_count(),
            result.summary.intersections.len()
        );

        // Load
        let outputs = self.pipeline.load(&result).await?;
        for output in &outputs {
            tracing::info!("📁 Wrote {}", output);
        }
        tracing::debug!("Run finished in {:?}", started.elapsed());

        Ok(EngineOutput { result, outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{IncidenceMatrix, SetCollection, SetInput, SortBy};
    use crate::utils::error::UpsetError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPipeline {
        inputs: Vec<SetInput>,
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<SetCollection> {
            SetCollection::from_inputs(&self.inputs)
        }

        async fn transform(&self, sets: SetCollection) -> Result<UpsetResult> {
            let matrix = IncidenceMatrix::derive(&sets);
            let summary = crate::core::intersections::summarize(&matrix, SortBy::Cardinality);
            Ok(UpsetResult { matrix, summary })
        }

        async fn load(&self, _result: &UpsetResult) -> Result<Vec<String>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["out/upset_matrix.csv".to_string()])
        }
    }

    #[tokio::test]
    async fn test_run_executes_all_stages() {
        let engine = UpsetEngine::new(CountingPipeline {
            inputs: vec![SetInput::new("A", ["x"]), SetInput::new("B", ["x", "y"])],
            loads: AtomicUsize::new(0),
        });

        let output = engine.run().await.unwrap();

        assert_eq!(output.outputs, vec!["out/upset_matrix.csv"]);
        assert_eq!(output.result.matrix.row_count(), 2);
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_validation_error() {
        let engine = UpsetEngine::new(CountingPipeline {
            inputs: vec![SetInput::new("", ["x"])],
            loads: AtomicUsize::new(0),
        });

        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, UpsetError::BlankSetName { index: 1 }));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }
}
