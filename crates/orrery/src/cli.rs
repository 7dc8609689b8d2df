use std::path::PathBuf;

use clap::Parser;
use orrery_engine::logging::LoggingConfig;
use orrery_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

use crate::sim::Simulation;

pub const WINDOW_TITLE: &str = "orrery [models] example - solar system";
pub const WINDOW_WIDTH: f64 = 800.0;
pub const WINDOW_HEIGHT: f64 = 450.0;

/// System fonts tried in order when `--font` is not given.
const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

#[derive(Parser, Debug)]
#[command(version, about = "Hierarchical solar system viewer", long_about = None)]
pub struct Args {
    /// Directory holding `solar_system/` textures and the sphere model
    #[arg(long, value_name = "DIR", default_value = "resources")]
    pub assets: PathBuf,

    /// TTF/OTF font for labels and HUD
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Initial rotation speed multiplier
    #[arg(long, value_name = "SPEED", default_value_t = Simulation::DEFAULT_SPEED, allow_negative_numbers = true)]
    pub speed: f32,

    /// Also put jupiter through pluto in orbit
    #[arg(long)]
    pub outer_planets: bool,

    /// Start with body labels hidden
    #[arg(long)]
    pub no_labels: bool,

    /// Target frames per second, 0 for unpaced
    #[arg(long, value_name = "FPS", default_value_t = 60)]
    pub fps: u32,

    /// Log filter in env_logger syntax, overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Args {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..Default::default()
        }
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: WINDOW_TITLE.to_string(),
            initial_size: LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            target_fps: self.fps,
        }
    }

    pub fn simulation(&self) -> Simulation {
        Simulation::new(self.speed)
    }

    /// Bytes of the requested font, or of the first readable system candidate.
    pub fn font_bytes(&self) -> Option<Vec<u8>> {
        if let Some(path) = &self.font {
            return match std::fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::warn!("can't read font {}: {e}", path.display());
                    None
                }
            };
        }
        FONT_CANDIDATES.iter().find_map(|p| std::fs::read(p).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_demo() {
        let args = Args::parse_from(["orrery"]);
        assert_eq!(args.assets, PathBuf::from("resources"));
        assert_eq!(args.simulation(), Simulation::default());
        assert!(!args.outer_planets);
        assert!(!args.no_labels);

        let rt = args.runtime();
        assert_eq!(rt.title, WINDOW_TITLE);
        assert_eq!(rt.target_fps, 60);
        assert_eq!(rt.initial_size, LogicalSize::new(800.0, 450.0));
        assert!(args.logging().env_filter.is_none());
    }

    #[test]
    fn flags_are_parsed() {
        let args = Args::parse_from([
            "orrery",
            "--assets",
            "/tmp/res",
            "--speed",
            "-0.5",
            "--outer-planets",
            "--no-labels",
            "--fps",
            "0",
            "--log",
            "debug",
        ]);
        assert_eq!(args.assets, PathBuf::from("/tmp/res"));
        assert_eq!(args.speed, -0.5);
        assert!(args.outer_planets && args.no_labels);
        assert_eq!(args.runtime().target_fps, 0);
        assert_eq!(args.logging().env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn unreadable_explicit_font_is_none() {
        let args = Args::parse_from(["orrery", "--font", "/no/such/font.ttf"]);
        assert!(args.font_bytes().is_none());
    }
}
