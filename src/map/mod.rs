pub mod geometry;
pub mod grid;
pub mod painter;
pub mod projection;
pub mod region;
pub mod renderer;
pub mod spatial;
pub mod tessellation;
pub mod viewport;
mod polygon;

pub use grid::{GridMap, SphereDim};
pub use painter::Painter;
pub use polygon::ScreenPolygon;
pub use projection::{Projection, ProjectionKind};
pub use region::MapRegion;
pub use renderer::{MapLayers, MapRenderer};
pub use viewport::{ScreenRect, ViewportParams};
