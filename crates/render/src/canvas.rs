use glam::DVec2;
use papercity_common::Color;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    Solid,
}

/// Per-shape style handed to the hand-drawn backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawOptions {
    /// `None` draws no outline.
    pub stroke_color: Option<Color>,
    pub stroke_width: f64,
    pub roughness: f64,
    pub bowing: f64,
    pub disable_multi_stroke: bool,
    /// Jitter seed; identical geometry always gets the same seed.
    pub seed: i64,
    pub fill_color: Option<Color>,
    pub fill_style: Option<FillStyle>,
}

/// Drawing surface consumed by the pipeline's emission step.
///
/// Implementations own sizing and pixels; the pipeline only hands over
/// screen-space points in draw order.
pub trait Canvas {
    /// Closed, filled shape.
    fn draw_polygon(&mut self, points: &[DVec2], options: &DrawOptions);

    /// Stroked polyline; closed only if the first and last points coincide.
    fn draw_path(&mut self, points: &[DVec2], options: &DrawOptions);
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Polygon {
        points: Vec<DVec2>,
        options: DrawOptions,
    },
    Path {
        points: Vec<DVec2>,
        options: DrawOptions,
    },
}

impl DrawCommand {
    pub fn points(&self) -> &[DVec2] {
        match self {
            DrawCommand::Polygon { points, .. } | DrawCommand::Path { points, .. } => points,
        }
    }

    pub fn options(&self) -> &DrawOptions {
        match self {
            DrawCommand::Polygon { options, .. } | DrawCommand::Path { options, .. } => options,
        }
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, DrawCommand::Polygon { .. })
    }
}

/// Canvas that keeps every call in order. Used for tests and JSON export.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn draw_polygon(&mut self, points: &[DVec2], options: &DrawOptions) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            options: options.clone(),
        });
    }

    fn draw_path(&mut self, points: &[DVec2], options: &DrawOptions) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            options: options.clone(),
        });
    }
}
