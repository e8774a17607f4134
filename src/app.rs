use tui_globe::config::GlobeConfig;
use tui_globe::geo::{AngleUnit, GeoCoordinate};
use tui_globe::map::renderer::RenderSettings;
use tui_globe::map::{GridMap, MapRenderer, Projection, ProjectionKind, ViewportParams};

/// Pixels the globe turns per key press
const KEY_ROTATE_STEP: f64 = 8.0;
const ZOOM_STEP: f64 = 1.25;

/// Application state
pub struct App {
    pub config: GlobeConfig,
    pub projection: Box<dyn Projection>,
    pub viewport: ViewportParams,
    pub grid: GridMap,
    pub map_renderer: MapRenderer,
    pub settings: RenderSettings,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for cursor marker
    pub mouse_pos: Option<(u16, u16)>,
}

/// Braille pixel size of the map area inside the border and above the status bar
fn map_pixel_size(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3); // 2 for border + 1 for status bar
    (inner_width * 2, inner_height * 4)
}

impl App {
    pub fn new(config: GlobeConfig, width: usize, height: usize) -> Self {
        let (pixel_width, pixel_height) = map_pixel_size(width, height);
        let mut grid = GridMap::new();
        grid.set_precision(config.grid_precision);

        Self {
            projection: config.build_projection(config.projection),
            viewport: config.viewport(pixel_width, pixel_height),
            grid,
            map_renderer: MapRenderer::new(),
            settings: RenderSettings {
                show_grid: config.show_grid,
                show_shape: config.show_shape,
                show_tropics: config.show_tropics,
                ..RenderSettings::default()
            },
            config,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = map_pixel_size(width, height);
        self.viewport.set_size(pixel_width, pixel_height);
    }

    /// Back to the configured center, zoom and projection
    pub fn reset(&mut self) {
        let (width, height) = (self.viewport.width(), self.viewport.height());
        self.viewport = self.config.viewport(width, height);
        self.projection = self.config.build_projection(self.config.projection);
    }

    /// Turn the view by whole key steps; positive `dx` looks east, positive `dy` north.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport
            .rotate_by_pixels(-dx as f64 * KEY_ROTATE_STEP, dy as f64 * KEY_ROTATE_STEP);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_by(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_by(1.0 / ZOOM_STEP);
    }

    pub fn cycle_projection(&mut self) {
        let next = self.projection.kind().next();
        self.projection = self.config.build_projection(next);
    }

    pub fn toggle_grid(&mut self) {
        self.settings.show_grid = !self.settings.show_grid;
    }

    pub fn toggle_shape(&mut self) {
        self.settings.show_shape = !self.settings.show_shape;
    }

    pub fn toggle_tropics(&mut self) {
        self.settings.show_tropics = !self.settings.show_tropics;
    }

    pub fn toggle_repeat(&mut self) {
        let repeat = !self.projection.repeat_x();
        self.projection.set_repeat_x(repeat);
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn projection_kind(&self) -> ProjectionKind {
        self.projection.kind()
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom())
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format_coordinate(&self.viewport.center_coordinate())
    }

    /// Geographic coordinate under the mouse cursor, if it is over the map
    pub fn mouse_coords(&self) -> Option<String> {
        let (px, py) = self.mouse_pixel_pos()?;
        let coordinate = self
            .projection
            .geo_coordinates(px as f64 + 0.5, py as f64 + 0.5, &self.viewport)?;
        Some(format_coordinate(&coordinate))
    }

    /// Handle mouse drag: the surface follows the cursor
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (x as f64 - last_x as f64) * 2.0;
            let dy = (y as f64 - last_y as f64) * 4.0;
            self.viewport.rotate_by_pixels(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Get mouse position in braille pixel coordinates (for rendering marker)
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| {
            // Account for border (1 cell offset)
            let px = ((col.saturating_sub(1)) as i32) * 2;
            let py = ((row.saturating_sub(1)) as i32) * 4;
            (px, py)
        })
    }
}

fn format_coordinate(coordinate: &GeoCoordinate) -> String {
    let lat = coordinate.lat_in(AngleUnit::Degree);
    let lon = coordinate.lon_in(AngleUnit::Degree);
    format!(
        "{:.1}°{}, {:.1}°{}",
        lat.abs(),
        if lat >= 0.0 { "N" } else { "S" },
        lon.abs(),
        if lon >= 0.0 { "E" } else { "W" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(GlobeConfig::default(), 82, 43)
    }

    #[test]
    fn test_map_area_excludes_chrome() {
        let app = app();
        assert_eq!(app.viewport.width(), 160);
        assert_eq!(app.viewport.height(), 160);
    }

    #[test]
    fn test_pan_east_moves_center_east() {
        let mut app = app();
        let before = app.viewport.center_coordinate().lon();
        app.pan(1, 0);
        assert!(app.viewport.center_coordinate().lon() > before);

        let before = app.viewport.center_coordinate().lat();
        app.pan(0, 1);
        assert!(app.viewport.center_coordinate().lat() > before);
    }

    #[test]
    fn test_cycle_and_reset() {
        let mut app = app();
        assert_eq!(app.projection_kind(), ProjectionKind::Spherical);
        app.cycle_projection();
        assert_eq!(app.projection_kind(), ProjectionKind::Equirect);
        app.zoom_in();
        app.reset();
        assert_eq!(app.projection_kind(), ProjectionKind::Spherical);
        assert_eq!(app.zoom_level(), "1.0x");
    }

    #[test]
    fn test_center_coords_format() {
        let app = app();
        assert!(app.center_coords().starts_with("20.0°N, 0.0°"), "{}", app.center_coords());
    }
}
