use std::{path::PathBuf, time::Duration};

use clap::{CommandFactory, Parser, error::ErrorKind};
use tracing::Level;

/// Step-by-step recursive backtracker maze generator for the terminal
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "maze-carver", version, about, long_about = None)]
pub struct Config {
    /// Canvas width in display units
    #[arg(
        long = "width",
        value_name = "UNITS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub canvas_width: u16,

    /// Canvas height in display units
    #[arg(
        long = "height",
        value_name = "UNITS",
        default_value_t = 750,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub canvas_height: u16,

    /// Size of one maze cell in display units
    #[arg(
        long,
        value_name = "UNITS",
        default_value_t = 25,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub cell_size: u16,

    /// Carving steps per second
    #[arg(
        long,
        value_name = "N",
        default_value_t = 60,
        value_parser = clap::value_parser!(u16).range(1..=Config::MAX_FPS as i64)
    )]
    pub fps: u16,

    /// Seed for reproducible mazes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start a new maze automatically once one is finished
    #[arg(long)]
    pub auto_reset: bool,

    /// Write logs to this file. Nothing is logged without it
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, value_name = "LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Config {
    /// Largest number of columns or rows. Keeps the glyph lattice addressable by
    /// terminal coordinates.
    pub const MAX_DIMENSION: u16 = u8::MAX as u16;
    /// Fastest configurable animation, matching `MIN_FRAME_INTERVAL`
    pub const MAX_FPS: u16 = 1000;
    /// Fastest allowed animation, one step per millisecond
    pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);
    /// Slowest allowed animation, one step per second
    pub const MAX_FRAME_INTERVAL: Duration = Duration::from_secs(1);

    /// Parse and validate command line arguments, including the executable name.
    pub fn from_args<I, T>(args: I) -> Result<Config, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::try_parse_from(args)?;
        config
            .validate()
            .map_err(|msg| Config::command().error(ErrorKind::ValueValidation, msg))?;
        Ok(config)
    }

    /// Check that the canvas and cell size describe a drawable grid.
    pub fn validate(&self) -> Result<(), String> {
        let (cols, rows) = self.grid_dimensions();
        if cols == 0 || rows == 0 {
            return Err(format!(
                "Canvas {}x{} is smaller than one cell of size {}.",
                self.canvas_width, self.canvas_height, self.cell_size
            ));
        }
        if cols > Config::MAX_DIMENSION || rows > Config::MAX_DIMENSION {
            return Err(format!(
                "Grid of {}x{} cells is too large, at most {} cells per side are supported.",
                cols,
                rows,
                Config::MAX_DIMENSION
            ));
        }
        Ok(())
    }

    /// Grid dimensions `(cols, rows)` derived from the canvas and cell size.
    pub fn grid_dimensions(&self) -> (u16, u16) {
        match self.cell_size {
            0 => (0, 0),
            size => (self.canvas_width / size, self.canvas_height / size),
        }
    }

    /// Time between two carving steps.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1) as u64)
            .clamp(Config::MIN_FRAME_INTERVAL, Config::MAX_FRAME_INTERVAL)
    }
}
