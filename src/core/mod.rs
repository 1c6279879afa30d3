pub mod engine;
pub mod intersections;
pub mod matrix;
pub mod pipeline;

pub use crate::domain::model::{IncidenceMatrix, SetCollection, UpsetResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
