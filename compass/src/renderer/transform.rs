//! Rotation transform derived from a heading and the surface bounds.

/// Current size of the hosting surface.
///
/// Zero width or height is legal: the surface may not be laid out yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceBounds {
    pub width: f32,
    pub height: f32,
}

impl SurfaceBounds {
    /// Create bounds from a width and height.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero (nothing visible to draw).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Geometric centre of the surface.
    ///
    /// Computed by halving, so empty bounds collapse to `(0, 0)`.
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Rotation applied to the needle graphic before drawing.
///
/// Derived on every draw from the current heading and bounds; never cache
/// one across a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    /// Rotation in degrees, `360 - heading`. Positive is clockwise on a
    /// y-down surface.
    pub rotation_degrees: f32,
    /// Pivot x coordinate (surface centre).
    pub pivot_x: f32,
    /// Pivot y coordinate (surface centre).
    pub pivot_y: f32,
}

impl RenderTransform {
    /// Build the transform for a heading on a surface of the given bounds.
    pub fn for_heading(heading_degrees: f32, bounds: SurfaceBounds) -> Self {
        let (pivot_x, pivot_y) = bounds.center();
        Self {
            rotation_degrees: 360.0 - heading_degrees,
            pivot_x,
            pivot_y,
        }
    }

    /// Rotation mapped into `[0, 360)`; a rotation of 360 becomes 0.
    pub fn normalized_degrees(&self) -> f32 {
        self.rotation_degrees.rem_euclid(360.0)
    }

    /// Apply the rotation to a point in surface coordinates (y grows down).
    pub fn rotate_point(&self, x: f32, y: f32) -> (f32, f32) {
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();
        let dx = x - self.pivot_x;
        let dy = y - self.pivot_y;
        (
            self.pivot_x + dx * cos - dy * sin,
            self.pivot_y + dx * sin + dy * cos,
        )
    }
}
