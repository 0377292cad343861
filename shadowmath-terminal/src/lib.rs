/// Terminal viewer driving the shadowmath transform pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use shadowmath_core::{Camera, Matrix4, ProjectionMode, Transform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod geometry;
pub mod renderer;

pub use config::{Cli, ViewerConfig};
pub use geometry::Mesh;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

const KEY_HELP: &str = "A/D=Spin P=Projection Q=Quit";

fn to_io(err: shadowmath_core::Error) -> io::Error {
    io::Error::other(err)
}

/// The demo scene: a cube spinning about Y above a floor, lit from the
/// soft-shadow light position.
pub struct Scene {
    pub cube: Mesh,
    pub cube_transform: Transform,
    pub floor: Mesh,
    pub floor_transform: Transform,
    pub camera: Camera,
    pub light: Camera,
}

impl Scene {
    pub fn new(config: &ViewerConfig, width: u16, height: u16) -> Self {
        let mut camera = Camera::soft_shadow_eye();
        camera.fovy = config.fovy;
        camera.aspect = width as f32 * CELL_ASPECT / height.max(1) as f32;
        if config.orthographic {
            camera.mode = ProjectionMode::Orthographic;
        }

        let half = config.cube_size / 2.0;
        Self {
            cube: Mesh::cube(config.cube_size),
            cube_transform: Transform::new().with_translation(0.0, half, 0.0),
            floor: Mesh::floor(),
            floor_transform: Transform::new().with_scale(3.0 * half + 1.0, 1.0, 3.0 * half + 1.0),
            camera,
            light: Camera::soft_shadow_light(),
        }
    }

    /// Model matrices of the cube and the floor
    pub fn models(&self) -> shadowmath_core::Result<(Matrix4, Matrix4)> {
        Ok((self.cube_transform.matrix()?, self.floor_transform.matrix()?))
    }

    pub fn render(&self, renderer: &mut AsciiRenderer) -> shadowmath_core::Result<()> {
        let view_projection = self.camera.view_projection()?;
        let (cube_model, floor_model) = self.models()?;

        renderer.clear();
        renderer.render_mesh(&self.floor, &floor_model, &view_projection, self.light.eye)?;
        renderer.render_mesh(&self.cube, &cube_model, &view_projection, self.light.eye)?;
        Ok(())
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    config: ViewerConfig,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // leave the top row for the status line
        let height = height.saturating_sub(1);

        Ok(Self {
            scene: Scene::new(&config, width, height),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            config,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.fps));

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.scene.cube_transform.rotate(self.config.spin_degrees);
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.config.spin_degrees -= 0.5;
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.config.spin_degrees += 0.5;
                }
                KeyCode::Char('p') => {
                    let camera = &mut self.scene.camera;
                    camera.mode = match camera.mode {
                        ProjectionMode::Perspective => ProjectionMode::Orthographic,
                        ProjectionMode::Orthographic => ProjectionMode::Perspective,
                    };
                    log::debug!("projection switched to {:?}", camera.mode);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.scene.render(&mut self.renderer).map_err(to_io)?;

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "shadowmath | FPS: {:.1} | spin {:+.1}°/frame | {:?} | {}",
                self.fps,
                self.config.spin_degrees,
                self.scene.camera.mode,
                KEY_HELP
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_renders_something() {
        let scene = Scene::new(&ViewerConfig::default(), 80, 40);
        let mut renderer = AsciiRenderer::new(80, 40);
        scene.render(&mut renderer).unwrap();
        let lit = (0..40)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != ' ')
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn test_cube_sits_on_floor() {
        let scene = Scene::new(&ViewerConfig::default(), 80, 40);
        let (cube, _) = scene.models().unwrap();
        // bottom face center of the cube lands on y = 0
        let [_, y, _, _] = cube.transform_point([0.0, -1.0, 0.0]);
        assert!(y.abs() < 1e-6);
    }
}
