use crate::domain::model::{OutputFiles, OutputFormat, SetCollection, SetInput, SortBy, UpsetResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn sets(&self) -> &[SetInput];
    fn output_formats(&self) -> &[OutputFormat];
    fn output_files(&self) -> &OutputFiles;
    fn sort_by(&self) -> SortBy;
    fn plot_scale(&self) -> u32;
    fn bundle(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SetCollection>;
    async fn transform(&self, sets: SetCollection) -> Result<UpsetResult>;
    async fn load(&self, result: &UpsetResult) -> Result<Vec<String>>;
}
