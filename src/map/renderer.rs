use rayon::prelude::*;
use tracing::debug;

use crate::braille::BrailleCanvas;
use crate::geo::{LatLonAltBox, LineString, LinearRing};
use crate::map::grid::GridMap;
use crate::map::projection::Projection;
use crate::map::region::MapRegion;
use crate::map::spatial::FeatureGrid;
use crate::map::viewport::ViewportParams;
use crate::map::{Painter, ScreenPolygon};

/// Index cell size in degrees
const INDEX_CELL_SIZE: f64 = 10.0;

/// One piece of vector geometry shown on the map.
#[derive(Clone, Debug)]
pub enum Shape {
    Line(LineString),
    Ring(LinearRing),
}

impl Shape {
    pub fn lat_lon_alt_box(&self) -> LatLonAltBox {
        match self {
            Shape::Line(line) => line.lat_lon_alt_box(),
            Shape::Ring(ring) => ring.lat_lon_alt_box(),
        }
    }

    fn screen_polygons(&self, projection: &dyn Projection, viewport: &ViewportParams) -> Vec<ScreenPolygon> {
        match self {
            Shape::Line(line) => projection.screen_polygons(line, viewport),
            Shape::Ring(ring) => projection.screen_polygons_ring(ring, viewport),
        }
    }
}

/// Display settings for map layers
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub show_coastlines: bool,
    pub show_grid: bool,
    pub show_tropics: bool,
    pub show_shape: bool,
    pub antialiasing: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_grid: true,
            show_tropics: false,
            show_shape: true,
            antialiasing: false,
        }
    }
}

/// Rendered layers, each on its own canvas so the UI can color them.
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub grid: BrailleCanvas,
    pub outline: BrailleCanvas,
    /// Pixels covered by the map
    pub region: MapRegion,
    /// Geographic box of the visible map
    pub visible_box: LatLonAltBox,
    /// Shapes that survived the box query
    pub candidates: usize,
}

/// Map renderer: vector shapes behind a coarse spatial index.
pub struct MapRenderer {
    shapes: Vec<Shape>,
    index: FeatureGrid,
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            index: FeatureGrid::new(INDEX_CELL_SIZE),
        }
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        let mut renderer = Self::new();
        renderer.extend(shapes);
        renderer
    }

    /// Add shapes and rebuild the index.
    pub fn extend(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        self.shapes.extend(shapes);
        let boxes = self.shapes.iter().map(Shape::lat_lon_alt_box).collect::<Vec<_>>();
        self.index = FeatureGrid::build(boxes.iter(), INDEX_CELL_SIZE);
    }

    pub fn has_data(&self) -> bool {
        !self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Project the shapes that can touch the viewport, in parallel.
    pub fn project(&self, projection: &dyn Projection, viewport: &ViewportParams) -> (LatLonAltBox, usize, Vec<ScreenPolygon>) {
        let visible_box = projection.lat_lon_alt_box(&viewport.rect(), viewport);
        let candidates = self.index.query_box(&visible_box);
        let polygons = candidates
            .par_iter()
            .flat_map_iter(|&i| self.shapes[i].screen_polygons(projection, viewport))
            .collect::<Vec<_>>();
        (visible_box, candidates.len(), polygons)
    }

    /// Render all layers into canvases of `width` x `height` characters.
    /// The viewport is expected to be sized in braille pixels (2x4 per character).
    pub fn render(
        &self,
        width: usize,
        height: usize,
        projection: &dyn Projection,
        viewport: &ViewportParams,
        grid: &mut GridMap,
        settings: &RenderSettings,
    ) -> MapLayers {
        let mut coastlines = BrailleCanvas::new(width, height);
        let mut grid_canvas = BrailleCanvas::new(width, height);
        let mut outline = BrailleCanvas::new(width, height);

        let (visible_box, candidates, polygons) = if settings.show_coastlines {
            self.project(projection, viewport)
        } else {
            (projection.lat_lon_alt_box(&viewport.rect(), viewport), 0, Vec::new())
        };

        coastlines.set_antialiasing(settings.antialiasing);
        for polygon in &polygons {
            coastlines.draw_screen_polygon(polygon);
        }

        if settings.show_grid {
            grid.clear();
            grid.create_grid(projection, viewport);
            if settings.show_tropics {
                grid.create_tropics(projection, viewport);
            }
            grid.paint_grid_map(&mut grid_canvas, settings.antialiasing);
        }

        if settings.show_shape {
            outline.set_antialiasing(settings.antialiasing);
            outline.draw_polygon(&projection.map_shape(viewport));
        }

        debug!(
            candidates,
            polygons = polygons.len(),
            grid = grid.polygons().len(),
            "rendered frame"
        );

        MapLayers {
            coastlines,
            grid: grid_canvas,
            outline,
            region: projection.map_region(viewport),
            visible_box,
            candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::ProjectionKind;

    fn renderer() -> MapRenderer {
        MapRenderer::from_shapes(vec![
            // around the center of the view
            Shape::Ring(LinearRing::from_degrees(&[(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)])),
            // far side of the globe
            Shape::Line(LineString::from_degrees(&[(170.0, 0.0), (175.0, 5.0)])),
        ])
    }

    fn count_set(canvas: &BrailleCanvas) -> usize {
        (0..canvas.pixel_height())
            .flat_map(|y| (0..canvas.pixel_width()).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.is_set(x, y))
            .count()
    }

    #[test]
    fn test_far_side_culled() {
        let globe = ProjectionKind::Spherical.build();
        // zoomed in far enough that neither pole is on screen
        let vp = ViewportParams::centered_on(0.0, 0.0, 300.0, 160, 160);
        let (bbox, candidates, polygons) = renderer().project(globe.as_ref(), &vp);
        assert!(!bbox.contains_lon_lat(175f64.to_radians(), 0.0));
        assert_eq!(candidates, 1);
        assert_eq!(polygons.len(), 1);
        assert!(polygons[0].closed);
    }

    #[test]
    fn test_render_layers() {
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::centered_on(0.0, 0.0, 60.0, 160, 160);
        let mut grid = GridMap::new();
        let layers = renderer().render(80, 40, globe.as_ref(), &vp, &mut grid, &RenderSettings::default());

        assert!(count_set(&layers.coastlines) > 0);
        assert!(count_set(&layers.grid) > 0);
        assert!(count_set(&layers.outline) > 0);
        assert!(layers.region.contains(80, 80));
        assert!(!grid.polygons().is_empty());
    }

    #[test]
    fn test_layers_toggled_off() {
        let globe = ProjectionKind::Equirect.build();
        let vp = ViewportParams::centered_on(0.0, 0.0, 60.0, 160, 160);
        let settings = RenderSettings {
            show_coastlines: false,
            show_grid: false,
            show_tropics: false,
            show_shape: false,
            antialiasing: false,
        };
        let mut grid = GridMap::new();
        let layers = renderer().render(80, 40, globe.as_ref(), &vp, &mut grid, &settings);
        assert_eq!(count_set(&layers.coastlines), 0);
        assert_eq!(count_set(&layers.grid), 0);
        assert_eq!(count_set(&layers.outline), 0);
        assert_eq!(layers.candidates, 0);
    }

    #[test]
    fn test_extend_rebuilds_index() {
        let mut renderer = MapRenderer::new();
        assert!(!renderer.has_data());
        renderer.extend([Shape::Line(LineString::from_degrees(&[(0.0, 0.0), (1.0, 1.0)]))]);
        assert_eq!(renderer.len(), 1);
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::centered_on(0.0, 0.0, 60.0, 160, 160);
        assert_eq!(renderer.project(globe.as_ref(), &vp).1, 1);
    }

    #[test]
    fn test_sparse_great_circle_edge_not_culled() {
        // both nodes sit at 59.5N but the arc between them peaks near 67.4N
        let renderer =
            MapRenderer::from_shapes(vec![Shape::Line(LineString::from_degrees(&[(0.0, 59.5), (90.0, 59.5)]))]);
        let globe = ProjectionKind::Spherical.build();
        let vp = ViewportParams::centered_on(45f64.to_radians(), 67f64.to_radians(), 4000.0, 160, 160);
        let (bbox, candidates, polygons) = renderer.project(globe.as_ref(), &vp);
        assert!(bbox.south > 60f64.to_radians());
        assert_eq!(candidates, 1);
        assert!(!polygons.is_empty());
    }
}
