//! Command-line options for the terminal showcase
use clap::Parser;
use showcase_core::{ControllerConfig, Rgb, ScrollState, Smoothing};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "showcase-terminal")]
#[command(about = "Scroll-driven 3D product showcase in the terminal", long_about = None)]
pub struct Cli {
    /// STL model to showcase; a placeholder box spins until it loads
    #[arg(long, default_value = "truck.stl")]
    pub model: PathBuf,

    /// Page height in viewports
    #[arg(long, default_value_t = 4.0)]
    pub pages: f64,

    /// Scroll easing time constant in seconds
    #[arg(long, default_value_t = 0.2)]
    pub damping: f64,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Ease position by elapsed time with this time constant (seconds)
    /// instead of a fixed fraction per frame
    #[arg(long)]
    pub smoothing_tau: Option<f64>,

    /// Half-width of the band around the wireframe threshold
    #[arg(long, default_value_t = 0.0)]
    pub hysteresis: f64,

    /// Wireframe color
    #[arg(long, default_value = "#00ff00")]
    pub wireframe_color: Rgb,

    /// Disable the ambient float
    #[arg(long)]
    pub no_float: bool,
}

impl Cli {
    pub fn controller_config(&self) -> ControllerConfig {
        let smoothing = match self.smoothing_tau {
            Some(tau) if tau.is_finite() && tau >= 0.0 => Smoothing::TimeCorrected {
                tau: Duration::from_secs_f64(tau),
            },
            _ => Smoothing::default(),
        };
        ControllerConfig {
            hysteresis: self.hysteresis.clamp(0.0, 0.5),
            smoothing,
            active_color: self.wireframe_color,
            ..Default::default()
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState::new(self.pages, self.damping)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(1000 / self.fps.clamp(1, 240) as u64)
    }
}
