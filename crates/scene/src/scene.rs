use papercity_common::{Color, Vector};
use serde::{Deserialize, Serialize};

/// Errors raised while building a scene. These are contract violations by
/// the caller and are reported at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("shape needs at least 2 vertices, got {count}")]
    TooFewVertices { count: usize },
    #[error("filled shape needs at least 3 vertices to enclose an area, got {count}")]
    OpenFilledShape { count: usize },
    #[error("viewport must be finite and positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// One drawable primitive: a filled polygon or a stroke-only polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeRecord")]
pub struct Shape {
    vertices: Vec<Vector>,
    fill: Option<Color>,
    stroke: bool,
    #[serde(skip)]
    sort_key: Option<f64>,
}

impl Shape {
    /// Validate and build a shape.
    pub fn new(
        vertices: Vec<Vector>,
        fill: Option<Color>,
        stroke: bool,
    ) -> Result<Self, SceneError> {
        let count = vertices.len();
        if count < 2 {
            return Err(SceneError::TooFewVertices { count });
        }
        if fill.is_some() && count < 3 {
            return Err(SceneError::OpenFilledShape { count });
        }
        Ok(Self {
            vertices,
            fill,
            stroke,
            sort_key: None,
        })
    }

    /// Filled, outlined polygon.
    pub fn polygon(vertices: Vec<Vector>, fill: Color) -> Result<Self, SceneError> {
        Self::new(vertices, Some(fill), true)
    }

    /// Stroke-only polyline.
    pub fn polyline(vertices: Vec<Vector>) -> Result<Self, SceneError> {
        Self::new(vertices, None, true)
    }

    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> bool {
        self.stroke
    }

    pub fn is_filled(&self) -> bool {
        self.fill.is_some()
    }

    /// Depth key from the most recent sort, `None` before any sort ran.
    pub fn sort_key(&self) -> Option<f64> {
        self.sort_key
    }

    /// Mean of the raw z coordinates.
    pub fn mean_z(&self) -> f64 {
        let n = self.vertices.len() as f64;
        self.vertices.iter().map(|v| v.z / n).sum()
    }

    /// Mean Euclidean distance from each vertex to `point`.
    pub fn mean_distance_to(&self, point: Vector) -> f64 {
        let n = self.vertices.len() as f64;
        self.vertices.iter().map(|v| v.distance(point) / n).sum()
    }
}

/// Unvalidated shape as read from disk.
#[derive(Deserialize)]
struct ShapeRecord {
    vertices: Vec<Vector>,
    fill: Option<Color>,
    stroke: bool,
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = SceneError;

    fn try_from(raw: ShapeRecord) -> Result<Self, Self::Error> {
        Shape::new(raw.vertices, raw.fill, raw.stroke)
    }
}

/// Ordered collection of shapes for one generation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SceneRecord")]
pub struct Scene {
    viewport_width: f64,
    viewport_height: f64,
    shapes: Vec<Shape>,
    /// Set once `depth_sort` has ordered the current shapes.
    #[serde(skip)]
    sorted: bool,
}

#[derive(Deserialize)]
struct SceneRecord {
    viewport_width: f64,
    viewport_height: f64,
    shapes: Vec<Shape>,
}

impl TryFrom<SceneRecord> for Scene {
    type Error = SceneError;

    fn try_from(raw: SceneRecord) -> Result<Self, Self::Error> {
        let mut scene = Scene::new(raw.viewport_width, raw.viewport_height)?;
        scene.shapes = raw.shapes;
        Ok(scene)
    }
}

impl Scene {
    /// Create an empty scene for a viewport of the given size.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Result<Self, SceneError> {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !valid(viewport_width) || !valid(viewport_height) {
            return Err(SceneError::InvalidViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }
        Ok(Self {
            viewport_width,
            viewport_height,
            shapes: Vec::new(),
            sorted: false,
        })
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.viewport_width / self.viewport_height
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Append an already validated shape. Keys from an earlier sort no
    /// longer describe the scene and are cleared.
    pub fn push(&mut self, shape: Shape) {
        if self.sorted {
            for existing in &mut self.shapes {
                existing.sort_key = None;
            }
            self.sorted = false;
        }
        self.shapes.push(shape);
    }

    /// Validate and append a shape in one step.
    pub fn add_shape(
        &mut self,
        vertices: Vec<Vector>,
        fill: Option<Color>,
        stroke: bool,
    ) -> Result<(), SceneError> {
        self.push(Shape::new(vertices, fill, stroke)?);
        Ok(())
    }

    /// Assign every shape its depth key and reorder by descending key
    /// (farthest first). The sort is stable, so equal keys keep insertion order.
    pub fn depth_sort(&mut self, key: impl Fn(&Shape) -> f64) {
        for shape in &mut self.shapes {
            shape.sort_key = Some(key(shape));
        }
        self.shapes.sort_by(|a, b| {
            let ka = a.sort_key.unwrap_or(f64::NEG_INFINITY);
            let kb = b.sort_key.unwrap_or(f64::NEG_INFINITY);
            kb.total_cmp(&ka)
        });
        self.sorted = true;
        tracing::trace!(shapes = self.shapes.len(), "scene depth sorted");
    }
}
