use glam::DVec2;
use papercity_common::Color;
use std::fmt::Write as _;
use std::path::Path;

use crate::canvas::{Canvas, DrawOptions};

/// Plain SVG canvas. Draws straight geometry; hand-drawn jitter is left to a
/// dedicated backend.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    background: Color,
    body: String,
    elements: usize,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            body: String::new(),
            elements: 0,
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements
    }

    /// Complete SVG document.
    pub fn finish(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            out,
            r#"  <rect width="100%" height="100%" {}/>"#,
            paint("fill", Some(self.background))
        );
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.finish())
    }

    fn element(&mut self, tag: &str, points: &[DVec2], fill: Option<Color>, options: &DrawOptions) {
        let pts = points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            self.body,
            r#"  <{tag} points="{pts}" {} {} stroke-width="{}" stroke-linejoin="round" data-seed="{}"/>"#,
            paint("fill", fill),
            paint("stroke", options.stroke_color),
            options.stroke_width,
            options.seed
        );
        self.elements += 1;
    }
}

/// `fill="#rrggbb" fill-opacity="a"` style attributes, or `="none"`.
fn paint(attr: &str, color: Option<Color>) -> String {
    match color {
        None => format!(r#"{attr}="none""#),
        Some(c) if c.is_opaque() => format!(r#"{attr}="{}""#, c.hex()),
        Some(c) => format!(r#"{attr}="{}" {attr}-opacity="{}""#, c.hex(), c.a),
    }
}

impl Canvas for SvgCanvas {
    fn draw_polygon(&mut self, points: &[DVec2], options: &DrawOptions) {
        self.element("polygon", points, options.fill_color, options);
    }

    fn draw_path(&mut self, points: &[DVec2], options: &DrawOptions) {
        self.element("polyline", points, None, options);
    }
}
