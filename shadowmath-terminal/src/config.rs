use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "shadowmath-terminal",
    about = "Terminal viewer for the shadowmath transform pipeline",
    long_about = "Renders a lit, rotating cube over a floor as ASCII art, driving every \
                  model, view, projection and normal matrix through shadowmath-core"
)]
pub struct Cli {
    /// Target frames per second
    #[arg(long, default_value = "30", value_name = "FPS")]
    pub fps: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value = "30.0", value_name = "DEGREES")]
    pub fov_degrees: f32,

    /// Cube edge length in world units
    #[arg(short = 's', long, default_value = "2.0", value_name = "SIZE")]
    pub size: f32,

    /// Rotation added every frame, in degrees (negative spins the other way)
    #[arg(long, default_value = "1.5", value_name = "DEGREES", allow_negative_numbers = true)]
    pub spin: f32,

    /// Start with the orthographic projection
    #[arg(short = 'o', long)]
    pub orthographic: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 || self.fps > 240 {
            return Err(format!("FPS must be between 1 and 240, got {}", self.fps));
        }
        if self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0 {
            return Err(format!(
                "Field of view must be in (0, 180) degrees, got {}",
                self.fov_degrees
            ));
        }
        if self.size <= 0.0 || !self.size.is_finite() {
            return Err("Cube size must be positive".to_string());
        }
        if !self.spin.is_finite() {
            return Err("Spin must be a finite number of degrees".to_string());
        }
        Ok(())
    }
}

/// Viewer settings after validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    pub fps: u32,
    /// Radians
    pub fovy: f32,
    pub cube_size: f32,
    pub spin_degrees: f32,
    pub orthographic: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            fovy: std::f32::consts::PI / 6.0,
            cube_size: 2.0,
            spin_degrees: 1.5,
            orthographic: false,
        }
    }
}

impl From<&Cli> for ViewerConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            fps: cli.fps,
            fovy: cli.fov_degrees.to_radians(),
            cube_size: cli.size,
            spin_degrees: cli.spin,
            orthographic: cli.orthographic,
        }
    }
}
