/// Input state for interactive demos.
///
/// Each piece of accumulated input (clicked points, drag angles) is an
/// explicit value owned by the caller and updated through methods, so
/// several canvases or tests can run side by side.

use crate::matrix::Mat4;
use std::f32::consts::TAU;

/// Horizontal drag distance, in pixels, that adds one full turn.
pub const DRAG_PIXELS_PER_TURN: f32 = 1280.0;

/// Maps a canvas-relative pixel to normalized device coordinates.
///
/// The canvas centre becomes `(0, 0)`, the right edge `x = 1` and the top
/// edge `y = 1` (pixel rows grow downwards).
pub fn canvas_to_ndc(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    ((x - half_w) / half_w, (half_h - y) / half_h)
}

/// Quadrant of an NDC point, used to colour clicked points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

impl Quadrant {
    /// Points on an axis go to the first matching branch: `x >= 0, y >= 0`
    /// is `First`, then `x < 0, y > 0`, then `x < 0, y < 0`, everything
    /// else `Fourth`.
    pub fn of(x: f32, y: f32) -> Self {
        if x >= 0.0 && y >= 0.0 {
            Quadrant::First
        } else if x < 0.0 && y > 0.0 {
            Quadrant::Second
        } else if x < 0.0 && y < 0.0 {
            Quadrant::Third
        } else {
            Quadrant::Fourth
        }
    }

    /// RGBA colour for points in this quadrant.
    pub fn color(self) -> [f32; 4] {
        match self {
            Quadrant::First => [1.0, 0.0, 0.0, 1.0],
            Quadrant::Second => [0.0, 1.0, 0.0, 1.0],
            Quadrant::Third => [0.0, 0.5, 1.0, 1.0],
            Quadrant::Fourth => [1.0, 1.0, 0.0, 1.0],
        }
    }
}

/// A recorded click in NDC with its quadrant colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickPoint {
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4],
}

/// Accumulates clicked points so they can all be redrawn each frame.
#[derive(Debug, Clone, Default)]
pub struct ClickRecorder {
    points: Vec<ClickPoint>,
}

impl ClickRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a click at canvas pixel `(x, y)` and returns the stored point.
    pub fn click(&mut self, x: f32, y: f32, width: f32, height: f32) -> ClickPoint {
        let (nx, ny) = canvas_to_ndc(x, y, width, height);
        let point = ClickPoint {
            x: nx,
            y: ny,
            color: Quadrant::of(nx, ny).color(),
        };
        self.points.push(point);
        point
    }

    pub fn points(&self) -> &[ClickPoint] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Mouse-drag rotation: horizontal motion yaws, vertical motion pitches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragRotation {
    dragging: bool,
    last: Option<(f32, f32)>,
    /// Yaw (about Y) and pitch (about X) in radians
    pub yaw: f32,
    pub pitch: f32,
}

impl DragRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Starts a drag if the press lands inside the `width x height` area.
    pub fn press(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if (0.0..=width).contains(&x) && (0.0..=height).contains(&y) {
            self.last = Some((x, y));
            self.dragging = true;
        }
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Cursor moved to `(x, y)`. Angles change only while dragging, but the
    /// last position is always tracked.
    pub fn moved(&mut self, x: f32, y: f32) {
        if self.dragging {
            if let Some((lx, ly)) = self.last {
                let factor = TAU / DRAG_PIXELS_PER_TURN;
                self.yaw += (factor * (x - lx)) % TAU;
                self.pitch += (factor * (ly - y)) % TAU;
            }
        }
        self.last = Some((x, y));
    }

    /// `Rx(pitch) * Ry(yaw)`: the yaw spins the model about its own Y axis
    /// first, the pitch then tilts it towards the viewer.
    pub fn matrix(&self) -> Mat4 {
        Mat4::rotation_x(self.pitch) * Mat4::rotation_y(self.yaw)
    }
}
