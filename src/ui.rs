use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use tui_globe::braille::BrailleCanvas;
use tui_globe::geo::LatLonAltBox;
use tui_globe::map::{MapLayers, MapRegion};

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let visible_box = render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, &visible_box, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &mut App, area: Rect) -> LatLonAltBox {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.projection_kind()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    app.viewport.set_size(inner.width as usize * 2, inner.height as usize * 4);

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        app.projection.as_ref(),
        &app.viewport,
        &mut app.grid,
        &app.settings,
    );
    let visible_box = layers.visible_box;

    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        if cx < inner.width && cy < inner.height {
            Some((cx, cy))
        } else {
            None
        }
    });

    frame.render_widget(MapWidget { layers, cursor_pos }, inner);
    visible_box
}

/// Braille map layers plus the cursor marker
struct MapWidget {
    layers: MapLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }

    /// Tint cells whose center pixel lies on the map
    fn render_region(&self, region: &MapRegion, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                if region.contains(col as usize * 2 + 1, row as usize * 4 + 2) {
                    buf[(area.x + col, area.y + row)].set_bg(Color::Rgb(8, 16, 32));
                }
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // back to front: map background, graticule, outline, coastlines
        self.render_region(&self.layers.region, area, buf);
        self.render_layer(&self.layers.grid, Color::DarkGray, area, buf);
        self.render_layer(&self.layers.outline, Color::Blue, area, buf);
        self.render_layer(&self.layers.coastlines, Color::Cyan, area, buf);

        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

fn toggle_span(on: bool, label_on: &'static str, label_off: &'static str) -> Span<'static> {
    Span::styled(
        if on { label_on } else { label_off },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn format_box(bbox: &LatLonAltBox) -> String {
    if bbox.is_empty() {
        return "nothing visible".to_string();
    }
    let (west, south, east, north) = bbox.to_degrees();
    format!("[{west:.0}°..{east:.0}°] x [{south:.0}°..{north:.0}°]")
}

fn render_status_bar(frame: &mut Frame, app: &App, visible_box: &LatLonAltBox, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" ", dim),
        toggle_span(app.settings.show_grid, "[G]rid ", "[g]rid "),
        toggle_span(app.settings.show_shape, "[O]utline ", "[o]utline "),
        toggle_span(app.settings.show_tropics, "[T]ropics ", "[t]ropics "),
        toggle_span(app.projection.repeat_x(), "[W]rap ", "[w]rap "),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim),
        Span::styled(format_box(visible_box), Style::default().fg(Color::Magenta)),
    ];
    if let Some(coords) = app.mouse_coords() {
        spans.push(Span::styled(" | ", dim));
        spans.push(Span::styled(coords, Style::default().fg(Color::Red)));
    }
    spans.push(Span::styled(" | hjkl:rotate +/-:zoom p:proj r:reset q:quit", dim));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
