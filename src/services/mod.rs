pub mod output_path;
pub mod pipeline;
pub mod raster_loader;

pub use output_path::{sibling_output_path, unique_output_path};
pub use pipeline::{JobReport, PrintPipeline, RenderedJob, StageTiming};
pub use raster_loader::{decode_png, load_png};
