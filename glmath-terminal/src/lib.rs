/// Terminal-based ASCII rasterizer driven by the glmath kernel
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use glmath_core::{
    Camera, DragRotation, Mesh, NodeId, PointLight, ProjectionMode, RotationState, SceneGraph,
    Transform, Vec3,
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod config;
pub mod renderer;

pub use config::{Config, SceneKind};
pub use renderer::{AsciiRenderer, DrawParams, Lighting};

/// Approximate pixel size of one terminal cell, used to feed mouse
/// positions to the drag controller.
const CELL_WIDTH: f32 = 8.0;
const CELL_HEIGHT: f32 = 16.0;

const KEY_STEP: f32 = 0.1;
const AMBIENT: f32 = 0.2;
const LIGHT_POSITION: Vec3 = Vec3::new(2.3, 4.0, 3.5);

/// Geometry plus the transform hierarchy that places it.
struct Scene {
    kind: SceneKind,
    graph: SceneGraph,
    mesh: Mesh,
    /// Node driven by the horizontal keys
    primary: NodeId,
    /// Node driven by the vertical keys
    secondary: NodeId,
}

impl Scene {
    fn build(kind: SceneKind) -> glmath_core::Result<Self> {
        let mut graph = SceneGraph::new();
        let scene = match kind {
            SceneKind::Cube => {
                let cube = graph.add_root(
                    Transform::IDENTITY.with_rotation(RotationState::new(0.3, 0.3, 0.0)),
                );
                Self {
                    kind,
                    graph,
                    mesh: Mesh::cube(2.0),
                    primary: cube,
                    secondary: cube,
                }
            }
            SceneKind::Arm => {
                let base = graph.add_root(Transform::from_translation(Vec3::new(0.0, -10.0, 0.0)));
                let upper = graph.add_child(
                    base,
                    Transform::from_translation(Vec3::new(0.0, 10.0, 0.0))
                        .with_scale(Vec3::new(0.8, 1.0, 0.8)),
                )?;
                Self {
                    kind,
                    graph,
                    mesh: Mesh::cuboid(Vec3::new(-1.5, 0.0, -1.5), Vec3::new(1.5, 10.0, 1.5)),
                    primary: base,
                    secondary: upper,
                }
            }
        };
        Ok(scene)
    }

    fn rotate(&mut self, id: NodeId, dx: f32, dy: f32, dz: f32) -> glmath_core::Result<()> {
        let mut local = self.graph.local(id)?;
        local.rotation.rotate(dx, dy, dz);
        self.graph.set_local(id, local)
    }

    /// Idle animation applied every frame.
    fn animate(&mut self) -> glmath_core::Result<()> {
        match self.kind {
            SceneKind::Cube => self.rotate(self.primary, 0.01, 0.015, 0.0),
            SceneKind::Arm => self.rotate(self.primary, 0.0, 0.01, 0.0),
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    drag: DragRotation,
    camera: Camera,
    lighting: Lighting,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, width, height)
    }

    /// Builds the app for a `width x height` character grid without
    /// touching the terminal.
    pub fn with_size(config: &Config, width: u16, height: u16) -> anyhow::Result<Self> {
        let scene = Scene::build(config.scene)?;
        let camera = config.camera(width, height);
        // Fail early on an unusable camera rather than on the first frame
        camera.view_projection()?;
        info!(scene = ?config.scene, mode = ?camera.mode, eye = ?camera.position, "starting");

        Ok(Self {
            scene,
            drag: DragRotation::new(),
            lighting: Lighting {
                light: PointLight::new(LIGHT_POSITION, Vec3::ONE),
                ambient: Vec3::splat(AMBIENT),
                base_color: Vec3::ONE,
                eye: camera.position,
                fog: config.fog(),
            },
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_millis(1000 / config.fps.max(1) as u64),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            // Update
            self.scene.animate()?;

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
                debug!(fps = self.fps, "frame rate");
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> glmath_core::Result<()> {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code)?,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> glmath_core::Result<()> {
        let (primary, secondary) = (self.scene.primary, self.scene.secondary);
        match (self.scene.kind, code) {
            (_, KeyCode::Char('q') | KeyCode::Esc) => self.running = false,
            (_, KeyCode::Char('p')) => self.toggle_projection(),
            (SceneKind::Cube, KeyCode::Char('w') | KeyCode::Up) => {
                self.scene.rotate(primary, KEY_STEP, 0.0, 0.0)?
            }
            (SceneKind::Cube, KeyCode::Char('s') | KeyCode::Down) => {
                self.scene.rotate(primary, -KEY_STEP, 0.0, 0.0)?
            }
            (SceneKind::Cube, KeyCode::Char('a') | KeyCode::Left) => {
                self.scene.rotate(primary, 0.0, -KEY_STEP, 0.0)?
            }
            (SceneKind::Cube, KeyCode::Char('d') | KeyCode::Right) => {
                self.scene.rotate(primary, 0.0, KEY_STEP, 0.0)?
            }
            (SceneKind::Cube, KeyCode::Char('e')) => {
                self.scene.rotate(primary, 0.0, 0.0, KEY_STEP)?
            }
            (SceneKind::Cube, KeyCode::Char('r')) => {
                self.scene.rotate(primary, 0.0, 0.0, -KEY_STEP)?
            }
            (SceneKind::Arm, KeyCode::Left) => self.scene.rotate(primary, 0.0, -KEY_STEP, 0.0)?,
            (SceneKind::Arm, KeyCode::Right) => self.scene.rotate(primary, 0.0, KEY_STEP, 0.0)?,
            (SceneKind::Arm, KeyCode::Up) => self.scene.rotate(secondary, 0.0, KEY_STEP, 0.0)?,
            (SceneKind::Arm, KeyCode::Down) => {
                self.scene.rotate(secondary, 0.0, -KEY_STEP, 0.0)?
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = mouse.column as f32 * CELL_WIDTH;
        let y = mouse.row as f32 * CELL_HEIGHT;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let width = self.renderer.width() as f32 * CELL_WIDTH;
                let height = self.renderer.height() as f32 * CELL_HEIGHT;
                self.drag.press(x, y, width, height);
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag.release(),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.drag.moved(x, y)
            }
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "terminal resized");
        self.renderer.resize(width as usize, height as usize);
        self.camera.set_viewport(width as u32, height as u32 * 2);
    }

    fn toggle_projection(&mut self) {
        self.camera.mode = match self.camera.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
        debug!(mode = ?self.camera.mode, "projection toggled");
    }

    /// Rasterizes every scene node into the character buffer.
    fn draw_scene(&mut self) -> glmath_core::Result<()> {
        self.scene.graph.update();
        let view_projection = self.camera.view_projection()?;
        let spin = self.drag.matrix();

        self.renderer.clear();
        for (_, world) in self.scene.graph.iter() {
            let model = spin * *world;
            let params = DrawParams {
                model,
                normal: model.normal_matrix()?,
                view_projection,
            };
            self.renderer.render_mesh(&self.scene.mesh, &params, &self.lighting);
        }
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.draw_scene()?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let mode = match self.camera.mode {
            ProjectionMode::Perspective => "persp",
            ProjectionMode::Orthographic => "ortho",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "glmath | FPS: {:.1} | {} | Arrows=Rotate Drag=Spin P=Projection Q=Quit",
                self.fps, mode
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
