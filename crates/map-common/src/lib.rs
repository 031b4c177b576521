//! Common types shared across the map annotation toolchain.

pub mod color;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod tile;

pub use color::{parse_color_spec, Color, BORDER_ALPHA};
pub use dataset::{Dataset, Nation, PortalStone, River, Stedding};
pub use error::{AnnotateError, AnnotateResult};
pub use geometry::Point;
pub use tile::TileGrid;
