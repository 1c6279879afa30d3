// Adapters layer: file formats, rendering and storage backends.

pub mod export;
pub mod plot;
pub mod storage;
pub mod text_plot;
