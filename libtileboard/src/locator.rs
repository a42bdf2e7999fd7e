use std::fmt::Display;

use super::coordinates::CoordinateFrame;
use super::geometry::Board;

/// The outcome of looking up which tile sits under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelResult {
    /// The point lies on the tile read out by this channel
    Channel(u32),
    /// The point is outside the angular or radial extent of the board
    OutOfBounds,
    /// The point is on the board but in the gap between tiles
    BetweenTiles,
}

impl ChannelResult {
    pub fn channel(&self) -> Option<u32> {
        match self {
            Self::Channel(ch) => Some(*ch),
            _ => None,
        }
    }

    pub fn is_channel(&self) -> bool {
        matches!(self, Self::Channel(_))
    }
}

impl Display for ChannelResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Channel(ch) => write!(f, "{ch}"),
            Self::OutOfBounds => write!(f, "out_of_bounds"),
            Self::BetweenTiles => write!(f, "between_tiles"),
        }
    }
}

/// Find the channel of the tile under the Cartesian point (x, y).
///
/// The point is given in `frame`. Every slot repeats the same tile shape mirrored about
/// its center line, so the point is folded onto one half of its slot and a single
/// trapezoid edge test decides between the tile and the gap next to it.
pub fn locate(board: &Board, frame: &CoordinateFrame, x: f64, y: f64) -> ChannelResult {
    let (r, phi) = frame.cartesian_to_polar(x, y);
    locate_polar(board, r, phi)
}

/// Find the channel under a point given in the board's own polar coordinates.
#[allow(clippy::nonminimal_bool)]
pub fn locate_polar(board: &Board, r: f64, phi: f64) -> ChannelResult {
    let [phi_min, phi_max] = board.angular_bounds();
    let [r_min, r_max] = board.radial_bounds();
    // Written so that NaN falls out of bounds
    if !(phi >= phi_min && phi <= phi_max && r >= r_min && r <= r_max) {
        return ChannelResult::OutOfBounds;
    }

    // phi == phi_max belongs to the last slot
    let pitch = board.slot_pitch();
    let slot_index = (((phi - phi_min) / pitch).floor() as usize).min(board.slot_count() - 1);

    // Fold onto the half of the slot with positive local x
    let phi_rest = (phi - board.slot_center(slot_index)).abs();
    let (x1, y1) = CoordinateFrame::local().polar_to_cartesian(r, -phi_rest);

    let ring_index = match board
        .rings()
        .iter()
        .position(|ring| ring.contains_height(y1))
    {
        Some(idx) => idx,
        None => return ChannelResult::BetweenTiles,
    };

    // Slanted tile edge through (a/2, radius - h/2) and (b/2, radius + h/2)
    let ring = &board.rings()[ring_index];
    let k = 2.0 * ring.tile_height / (ring.long_width - ring.short_width);
    let d = ring.inner_edge() - k * ring.short_width / 2.0;
    if y1 <= k * x1 + d {
        return ChannelResult::BetweenTiles;
    }

    match board.channel(ring_index, slot_index) {
        Some(ch) => ChannelResult::Channel(ch),
        None => ChannelResult::BetweenTiles,
    }
}

/// ChannelLocator owns the board and the session frame used to look up channels.
///
/// Both are read-only after construction, so a locator can be shared between threads.
#[derive(Debug, Clone)]
pub struct ChannelLocator {
    board: Board,
    frame: CoordinateFrame,
}

impl ChannelLocator {
    pub fn new(board: Board, frame: CoordinateFrame) -> Self {
        Self { board, frame }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    /// Channel under a Cartesian point in the session frame
    pub fn locate(&self, x: f64, y: f64) -> ChannelResult {
        locate(&self.board, &self.frame, x, y)
    }

    /// Channel under a polar point in the board frame
    pub fn locate_polar(&self, r: f64, phi: f64) -> ChannelResult {
        locate_polar(&self.board, r, phi)
    }

    /// Channel under each point of a set. Extra elements of the longer slice are ignored.
    pub fn locate_all(&self, x: &[f64], y: &[f64]) -> Vec<ChannelResult> {
        x.iter()
            .zip(y.iter())
            .map(|(x, y)| self.locate(*x, *y))
            .collect()
    }
}
