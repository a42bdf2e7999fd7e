// A Board is one hardware revision of a tileboard written down as data. The locator
// reads every number it needs from here.
//
// Everything is checked once in Board::new. After that the board is read-only: every
// number is finite, ring bands are ordered, every trapezoid has a finite positive edge
// slope and the channel table has exactly one entry per (ring, slot).
use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::error::GeometryError;

/// The bundled D8 catalog
fn load_default_catalog() -> &'static str {
    include_str!("data/d8_geometry.yaml")
}

/// One concentric ring of trapezoidal tiles.
///
/// The short edge of each tile faces the board center, the long edge faces outward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileRing {
    pub radius: f64,
    pub tile_height: f64,
    pub short_width: f64,
    pub long_width: f64,
}

impl TileRing {
    pub fn inner_edge(&self) -> f64 {
        self.radius - self.tile_height / 2.0
    }

    pub fn outer_edge(&self) -> f64 {
        self.radius + self.tile_height / 2.0
    }

    /// Check if a local height (distance along the slot center line) lies in this ring's band
    pub fn contains_height(&self, y: f64) -> bool {
        y >= self.inner_edge() && y <= self.outer_edge()
    }
}

/// The on-disk form of a board revision, (de)serializable to YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCatalog {
    pub name: String,
    pub angular_bounds: [f64; 2],
    pub radial_bounds: [f64; 2],
    pub angular_slot_count: usize,
    pub rings: Vec<TileRing>,
    pub channel_table: Vec<u32>,
    #[serde(default)]
    pub unpopulated_channels: Vec<u32>,
}

impl BoardCatalog {
    /// Read a catalog from a YAML file
    pub fn read_catalog_file(path: &Path) -> Result<Self, GeometryError> {
        let yaml_str = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// The bundled D8 catalog
    pub fn d8() -> Result<Self, GeometryError> {
        Ok(serde_yaml::from_str::<Self>(load_default_catalog())?)
    }
}

/// Validated, immutable tileboard geometry.
#[derive(Debug, Clone)]
pub struct Board {
    catalog: BoardCatalog,
    channel_positions: FxHashMap<u32, (usize, usize)>,
    unpopulated: FxHashSet<u32>,
}

fn check_finite(name: &str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFiniteValue(name.to_string(), value))
    }
}

impl Board {
    /// Create a new Board from a catalog, rejecting inconsistent geometry
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn new(catalog: BoardCatalog) -> Result<Self, GeometryError> {
        if catalog.rings.is_empty() || catalog.angular_slot_count == 0 {
            return Err(GeometryError::EmptyBoard);
        }

        let [phi_min, phi_max] = catalog.angular_bounds;
        check_finite("angular_bounds", phi_min)?;
        check_finite("angular_bounds", phi_max)?;
        if !(phi_min < phi_max) {
            return Err(GeometryError::BadAngularBounds(phi_min, phi_max));
        }
        let [r_min, r_max] = catalog.radial_bounds;
        check_finite("radial_bounds", r_min)?;
        check_finite("radial_bounds", r_max)?;
        if !(r_min < r_max) {
            return Err(GeometryError::BadRadialBounds(r_min, r_max));
        }

        for (idx, ring) in catalog.rings.iter().enumerate() {
            check_finite(&format!("rings[{idx}].radius"), ring.radius)?;
            check_finite(&format!("rings[{idx}].tile_height"), ring.tile_height)?;
            check_finite(&format!("rings[{idx}].short_width"), ring.short_width)?;
            check_finite(&format!("rings[{idx}].long_width"), ring.long_width)?;
            if !(ring.tile_height > 0.0) {
                return Err(GeometryError::BadTileHeight(idx, ring.tile_height));
            }
            if !(ring.short_width > 0.0 && ring.short_width < ring.long_width) {
                return Err(GeometryError::BadTrapezoid(
                    idx,
                    ring.short_width,
                    ring.long_width,
                ));
            }
            if idx > 0 {
                let previous = catalog.rings[idx - 1].radius;
                if !(ring.radius > previous) {
                    return Err(GeometryError::NonMonotonicRings(idx, ring.radius, previous));
                }
            }
        }

        let expected = catalog.rings.len() * catalog.angular_slot_count;
        if catalog.channel_table.len() != expected {
            return Err(GeometryError::ChannelTableSize(
                catalog.channel_table.len(),
                expected,
            ));
        }

        let mut channel_positions = FxHashMap::default();
        for (idx, channel) in catalog.channel_table.iter().enumerate() {
            let position = (
                idx / catalog.angular_slot_count,
                idx % catalog.angular_slot_count,
            );
            if channel_positions.insert(*channel, position).is_some() {
                return Err(GeometryError::DuplicateChannel(*channel));
            }
        }

        let mut unpopulated = FxHashSet::default();
        for channel in catalog.unpopulated_channels.iter() {
            if !channel_positions.contains_key(channel) {
                return Err(GeometryError::UnknownUnpopulatedChannel(*channel));
            }
            unpopulated.insert(*channel);
        }

        Ok(Self {
            catalog,
            channel_positions,
            unpopulated,
        })
    }

    /// The bundled D8 board
    pub fn d8() -> Result<Self, GeometryError> {
        Self::new(BoardCatalog::d8()?)
    }

    /// Load a board from a catalog file.
    /// If the path is None, we load the D8 catalog that is bundled with the library
    pub fn load(path: Option<&Path>) -> Result<Self, GeometryError> {
        let catalog = match path {
            Some(p) => BoardCatalog::read_catalog_file(p)?,
            None => BoardCatalog::d8()?,
        };
        let board = Self::new(catalog)?;
        spdlog::info!(
            "Loaded tileboard geometry {} with {} rings x {} slots",
            board.name(),
            board.ring_count(),
            board.slot_count()
        );
        Ok(board)
    }

    pub fn name(&self) -> &str {
        &self.catalog.name
    }

    pub fn angular_bounds(&self) -> [f64; 2] {
        self.catalog.angular_bounds
    }

    pub fn radial_bounds(&self) -> [f64; 2] {
        self.catalog.radial_bounds
    }

    pub fn rings(&self) -> &[TileRing] {
        &self.catalog.rings
    }

    pub fn ring_count(&self) -> usize {
        self.catalog.rings.len()
    }

    pub fn slot_count(&self) -> usize {
        self.catalog.angular_slot_count
    }

    /// Angular width of one slot in degrees
    pub fn slot_pitch(&self) -> f64 {
        let [phi_min, phi_max] = self.catalog.angular_bounds;
        (phi_max - phi_min) / self.catalog.angular_slot_count as f64
    }

    /// Angle of a slot's center line in degrees
    pub fn slot_center(&self, slot: usize) -> f64 {
        self.catalog.angular_bounds[0] + (slot as f64 + 0.5) * self.slot_pitch()
    }

    /// Angles of the sensor positions, one per slot
    pub fn sipm_angles(&self) -> Vec<f64> {
        (0..self.slot_count())
            .map(|slot| self.slot_center(slot))
            .collect()
    }

    /// Get the channel of the tile at a given ring and slot.
    ///
    /// Returns None if the ring or slot do not exist on this board
    pub fn channel(&self, ring: usize, slot: usize) -> Option<u32> {
        if ring >= self.ring_count() || slot >= self.slot_count() {
            return None;
        }
        Some(self.catalog.channel_table[ring * self.slot_count() + slot])
    }

    /// Get the (ring, slot) of a channel, if it exists on this board
    pub fn position_of(&self, channel: u32) -> Option<(usize, usize)> {
        self.channel_positions.get(&channel).copied()
    }

    /// A channel is populated if it is on the board and has a sensor mounted
    pub fn is_populated(&self, channel: u32) -> bool {
        self.channel_positions.contains_key(&channel)
            && !self.unpopulated.contains(&channel)
    }

    /// The channel table in (ring, slot) order
    pub fn channels(&self) -> &[u32] {
        &self.catalog.channel_table
    }
}
