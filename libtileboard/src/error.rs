use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Board geometry failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Board geometry failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Board geometry requires at least one ring and one angular slot")]
    EmptyBoard,
    #[error("Board geometry value {0} must be finite, found {1}")]
    NonFiniteValue(String, f64),
    #[error("Board angular bounds are not increasing -- min: {0} max: {1}")]
    BadAngularBounds(f64, f64),
    #[error("Board radial bounds are not increasing -- min: {0} max: {1}")]
    BadRadialBounds(f64, f64),
    #[error("Ring radii must be strictly increasing -- ring {0} has radius {1} after {2}")]
    NonMonotonicRings(usize, f64, f64),
    #[error("Ring {0} has an invalid tile height {1}; expected a positive value")]
    BadTileHeight(usize, f64),
    #[error("Ring {0} has invalid trapezoid widths -- short: {1} long: {2}; expected 0 < short < long")]
    BadTrapezoid(usize, f64, f64),
    #[error("Channel table has {0} entries; expected {1} (rings x slots)")]
    ChannelTableSize(usize, usize),
    #[error("Channel {0} appears more than once in the channel table")]
    DuplicateChannel(u32),
    #[error("Unpopulated channel {0} does not appear in the channel table")]
    UnknownUnpopulatedChannel(u32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Target list failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Target list failed due to CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Could not open hit list because file {0:?} does not exist")]
    BadFilePath(PathBuf),
}
