//! Beam target lists for scanning a tileboard with a motorized stage, and the check
//! that recorded hit positions landed on the intended channel.
//!
//! Target and hit lists are CSV files with the columns
//!
//! ```csv
//! label,x,y
//! ```
//!
//! For generated targets the label is the channel number. Hit lists may use any label.
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::coordinates::CoordinateFrame;
use super::error::TargetError;
use super::geometry::Board;
use super::locator::{ChannelLocator, ChannelResult};

/// Controls where on each tile a target is placed and the order of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSettings {
    /// Added to the slot center angle (degrees)
    pub angle_offset: f64,
    /// Added to the ring radius (mm)
    pub radius_offset: f64,
    /// The stage x axis at the beam line is opposite to the board x axis
    pub mirror_x: bool,
    /// Reverse every other ring so the stage never travels back across the board
    pub serpentine: bool,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            angle_offset: 0.25,
            radius_offset: 7.0,
            mirror_x: true,
            serpentine: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// A hit position together with the channel found under it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedHit {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub result: ChannelResult,
}

/// The (ring, slot) visiting order of a scan
pub fn scan_order(n_rings: usize, n_slots: usize, serpentine: bool) -> Vec<(usize, usize)> {
    let mut order = Vec::with_capacity(n_rings * n_slots);
    for ring in 0..n_rings {
        if serpentine && ring % 2 == 1 {
            order.extend((0..n_slots).rev().map(|slot| (ring, slot)));
        } else {
            order.extend((0..n_slots).map(|slot| (ring, slot)));
        }
    }
    order
}

/// Generate one target per populated tile, in scan order
pub fn generate_targets(
    board: &Board,
    frame: &CoordinateFrame,
    settings: &TargetSettings,
) -> Vec<Target> {
    let mut targets = Vec::new();
    for (ring, slot) in scan_order(board.ring_count(), board.slot_count(), settings.serpentine) {
        let channel = match board.channel(ring, slot) {
            Some(ch) => ch,
            None => continue,
        };
        if !board.is_populated(channel) {
            spdlog::debug!("Skipping unpopulated channel {channel}");
            continue;
        }
        let r = board.rings()[ring].radius + settings.radius_offset;
        let phi = board.slot_center(slot) + settings.angle_offset;
        let (x, y) = frame.polar_to_cartesian(r, phi);
        targets.push(Target {
            label: channel.to_string(),
            x: if settings.mirror_x { -x } else { x },
            y,
        });
    }
    spdlog::info!(
        "Generated {} targets for board {}",
        targets.len(),
        board.name()
    );
    targets
}

/// Classify each hit. If `mirror_x` is set the hits are in stage coordinates and x is
/// flipped back before the lookup.
pub fn classify_hits(
    locator: &ChannelLocator,
    hits: &[Target],
    mirror_x: bool,
) -> Vec<ClassifiedHit> {
    hits.iter()
        .map(|hit| {
            let x = if mirror_x { -hit.x } else { hit.x };
            ClassifiedHit {
                label: hit.label.clone(),
                x: hit.x,
                y: hit.y,
                result: locator.locate(x, hit.y),
            }
        })
        .collect()
}

/// Write a target list to a CSV file
pub fn write_targets(path: &Path, targets: &[Target]) -> Result<(), TargetError> {
    let mut writer = csv::Writer::from_path(path)?;
    for target in targets {
        writer.serialize(target)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a list of hit positions from a CSV file
pub fn read_hits(path: &Path) -> Result<Vec<Target>, TargetError> {
    if !path.exists() {
        return Err(TargetError::BadFilePath(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut hits: Vec<Target> = Vec::new();
    for record in reader.deserialize::<Target>() {
        hits.push(record?);
    }
    Ok(hits)
}

/// Write classified hits to a CSV file with the columns label,x,y,result
pub fn write_classified(path: &Path, hits: &[ClassifiedHit]) -> Result<(), TargetError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["label", "x", "y", "result"])?;
    for hit in hits {
        writer.write_record([
            hit.label.clone(),
            hit.x.to_string(),
            hit.y.to_string(),
            hit.result.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
