/// Command-line configuration for the terminal demo.

use clap::{Parser, ValueEnum};
use glmath_core::{Camera, Fog, ProjectionMode, Vec3};
use std::path::PathBuf;

/// Which demo scene to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// A single cube rotated by keys and mouse drag
    Cube,
    /// Two stacked boxes: the upper one rotates on top of the lower one
    Arm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectionArg {
    Perspective,
    Orthographic,
}

impl From<ProjectionArg> for ProjectionMode {
    fn from(arg: ProjectionArg) -> Self {
        match arg {
            ProjectionArg::Perspective => ProjectionMode::Perspective,
            ProjectionArg::Orthographic => ProjectionMode::Orthographic,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "glmath-terminal")]
#[command(author, version, about = "ASCII renderer driven by the glmath transform kernel")]
#[command(long_about = "
Renders a lit cube or a two-segment arm in the terminal.

Controls:
  cube: WASD / arrows rotate, E/R roll, mouse drag spins
  arm:  left/right rotate the base, up/down rotate the upper segment
  P toggles perspective/orthographic, Q or Esc quits
")]
pub struct Config {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cube")]
    pub scene: SceneKind,

    /// Projection used at start-up
    #[arg(long, value_enum, default_value = "perspective")]
    pub projection: ProjectionArg,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    /// Camera position (defaults depend on the scene)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub eye: Option<Vec<f32>>,

    /// Near clipping plane
    #[arg(long, default_value = "1.0")]
    pub near: f32,

    /// Far clipping plane
    #[arg(long, default_value = "100.0")]
    pub far: f32,

    /// Linear fog start and end distances
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    pub fog: Option<Vec<f32>>,

    /// Target frames per second
    #[arg(long, default_value = "30")]
    pub fps: u32,

    /// Write diagnostics to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    fn default_eye(&self) -> Vec3 {
        match self.scene {
            SceneKind::Cube => Vec3::new(3.0, 3.0, 7.0),
            SceneKind::Arm => Vec3::new(20.0, 10.0, 30.0),
        }
    }

    fn default_fov(&self) -> f32 {
        match self.scene {
            SceneKind::Cube => 30.0,
            SceneKind::Arm => 50.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        match self.eye.as_deref() {
            Some(&[x, y, z]) => Vec3::new(x, y, z),
            _ => self.default_eye(),
        }
    }

    /// Camera for a `columns x rows` character grid.
    ///
    /// Terminal cells are about twice as tall as they are wide, so the
    /// aspect ratio counts each row twice.
    pub fn camera(&self, columns: u16, rows: u16) -> Camera {
        let mut camera = Camera::new(columns as u32, rows as u32 * 2);
        camera.position = self.eye();
        camera.fov = self.fov.unwrap_or_else(|| self.default_fov());
        camera.near = self.near;
        camera.far = self.far;
        camera.mode = self.projection.into();
        camera
    }

    pub fn fog(&self) -> Option<Fog> {
        match self.fog.as_deref() {
            Some(&[start, end]) => Some(Fog::new(Vec3::ZERO, start, end)),
            _ => None,
        }
    }
}
