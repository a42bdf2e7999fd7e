//! # libtileboard
//!
//! libtileboard maps positions on a segmented tileboard to the readout channel of the
//! scintillator tile sitting at that position. It is used at test beams to check that
//! the positions a motorized stage moves the board to actually put the beam on the
//! intended channel, and to generate the list of stage positions in the first place.
//!
//! ## Geometry
//!
//! A tileboard is an annular sector: a set of concentric rings of trapezoidal tiles,
//! every ring split into the same number of angular slots. Each (ring, slot) is one tile
//! and one channel. A board revision is described by a YAML catalog:
//!
//! ```yml
//! name: D8
//! angular_bounds: [-5.0, 5.0]
//! radial_bounds: [1537.05, 1829.55]
//! angular_slot_count: 8
//! rings:
//!   - { radius: 1554.19, tile_height: 34.28, short_width: 33.53, long_width: 34.28 }
//!   # ... one entry per ring, ordered by radius
//! channel_table: [69, 71, 65, 67, 60, 62, 56, 58, ...]
//! unpopulated_channels: []
//! ```
//!
//! Lengths are in mm and angles in degrees. The channel table is indexed by
//! `ring * angular_slot_count + slot`. `unpopulated_channels` lists tiles without a
//! sensor; they still classify as their channel but no scan targets are made for them.
//! The D8 catalog is bundled with the library and used when no catalog file is given.
//!
//! ## Coordinates
//!
//! Positions are converted through a [`coordinates::CoordinateFrame`], an origin offset
//! plus a base rotation. With the default base rotation of 90 degrees an angle of zero
//! points along +y, which is the center line of the board. At a test beam the origin is
//! the stage position found to put the beam on the board's center, so it changes every
//! time the setup is moved.
//!
//! ## Channel lookup
//!
//! [`locator::locate`] returns a [`locator::ChannelResult`]: the channel under the
//! point, `OutOfBounds` if the point is off the board, or `BetweenTiles` if it falls in
//! a gap between tiles. These are ordinary values, never errors.
//!
//! ## Configuration
//!
//! A session is described by a YAML [`config::Config`]:
//!
//! ```yml
//! origin: [-361.4, -2306.2]
//! base_rotation: 90.0
//! geometry_path: null
//! targets:
//!   angle_offset: 0.25
//!   radius_offset: 7.0
//!   mirror_x: true
//!   serpentine: true
//! target_path: hit_positions.csv
//! classified_path: classified_hits.csv
//! ```
//!
//! If `geometry_path` is `null` the bundled D8 catalog is used.
pub mod config;
pub mod coordinates;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod locator;
pub mod targets;
