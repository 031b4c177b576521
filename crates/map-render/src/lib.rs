//! Rendering for the map annotation pipeline.
//!
//! Stages, in pipeline order:
//! - Catmull-Rom interpolation of sparse border vertices
//! - Supersampled border stroking (rasterize at N×, Lanczos downsample,
//!   alpha-composite)
//! - Icon stamping and stroked text labels
//! - Export (PNG with alpha, JPEG, optional tile grid)

pub mod border;
pub mod dpi;
pub mod export;
pub mod icons;
pub mod labels;
pub mod pipeline;
pub mod spline;

pub use border::BorderPath;
pub use export::OutputFormat;
pub use pipeline::{render_map, AnnotationAssets, RenderConfig};
