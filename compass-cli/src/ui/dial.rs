//! Rotating compass dial widget.
//!
//! The dial is laid out on a fixed 200×200 surface with y growing down,
//! rotated with the engine's [`RenderTransform`], then mapped onto the
//! canvas (y up, origin in the centre).

use compass::engine::EngineSnapshot;
use compass::renderer::{RenderTransform, SurfaceBounds};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line},
        Block, Borders, Widget,
    },
};

const SURFACE: f32 = 200.0;
const RADIUS: f32 = 90.0;

/// Cardinal labels at their unrotated positions.
const CARDINALS: [(&str, f32, f32, Color); 4] = [
    ("N", 100.0, 100.0 - RADIUS + 12.0, Color::Red),
    ("E", 100.0 + RADIUS - 12.0, 100.0, Color::White),
    ("S", 100.0, 100.0 + RADIUS - 12.0, Color::White),
    ("W", 100.0 - RADIUS + 12.0, 100.0, Color::White),
];

/// Dial showing where north lies for the current heading.
pub struct CompassDial<'a> {
    snapshot: &'a EngineSnapshot,
}

impl<'a> CompassDial<'a> {
    pub fn new(snapshot: &'a EngineSnapshot) -> Self {
        Self { snapshot }
    }

    /// The canvas is a fixed `SURFACE`-sized virtual surface whatever the
    /// terminal area, and ratatui scales it into `area` when painting.
    fn transform(&self) -> RenderTransform {
        self.snapshot.transform(SurfaceBounds::new(SURFACE, SURFACE))
    }
}

/// Surface point (y down) to canvas point (y up, centred).
fn to_canvas(point: (f32, f32)) -> (f64, f64) {
    let half = SURFACE / 2.0;
    (f64::from(point.0 - half), f64::from(half - point.1))
}

impl Widget for CompassDial<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let transform = self.transform();
        let heading = self.snapshot.heading;
        let title = match heading {
            Some(heading) => format!(" {} ", heading),
            None if !self.snapshot.display.sensor_available() => " no sensor ".to_string(),
            None => " no heading ".to_string(),
        };

        let half = f64::from(SURFACE / 2.0);
        Canvas::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .x_bounds([-half, half])
            .y_bounds([-half, half])
            .paint(|ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: f64::from(RADIUS),
                    color: Color::DarkGray,
                });

                if heading.is_none() {
                    return;
                }

                // North half of the needle in red, south half in grey
                let (nx, ny) = to_canvas(transform.rotate_point(100.0, 100.0 - RADIUS + 25.0));
                let (sx, sy) = to_canvas(transform.rotate_point(100.0, 100.0 + RADIUS - 25.0));
                ctx.draw(&Line {
                    x1: 0.0,
                    y1: 0.0,
                    x2: nx,
                    y2: ny,
                    color: Color::Red,
                });
                ctx.draw(&Line {
                    x1: 0.0,
                    y1: 0.0,
                    x2: sx,
                    y2: sy,
                    color: Color::Gray,
                });

                ctx.layer();
                for (label, x, y, color) in CARDINALS {
                    let (cx, cy) = to_canvas(transform.rotate_point(x, y));
                    ctx.print(cx, cy, Span::styled(label, Style::default().fg(color)));
                }
            })
            .render(area, buf);
    }
}
