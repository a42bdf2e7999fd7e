//! Board layout in a coordinate frame: the board outline, the nominal sensor (SiPM)
//! positions and the tile corners. These are the shapes a viewer or a stage planner
//! needs; no drawing happens here.
use ndarray::{array, Array1};

use super::coordinates::CoordinateFrame;
use super::geometry::Board;

const MIN_ARC_POINTS: usize = 2;

/// Nominal position of a sensor, at a ring radius on a slot center line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SipmPosition {
    pub channel: u32,
    pub ring: usize,
    pub slot: usize,
    pub x: f64,
    pub y: f64,
}

/// Closed outline of the annular sector covered by the board.
///
/// `detail` is the number of points used for each arc (at least 2). The first point is
/// repeated at the end.
pub fn board_outline(board: &Board, frame: &CoordinateFrame, detail: usize) -> Vec<[f64; 2]> {
    let detail = detail.max(MIN_ARC_POINTS);
    let [phi_min, phi_max] = board.angular_bounds();
    let [r_min, r_max] = board.radial_bounds();

    let angles = Array1::linspace(phi_min, phi_max, detail);
    let (x_inner, y_inner) =
        frame.polar_to_cartesian_array(&Array1::from_elem(detail, r_min), &angles);
    let (x_outer, y_outer) =
        frame.polar_to_cartesian_array(&Array1::from_elem(detail, r_max), &angles);

    let mut outline: Vec<[f64; 2]> = x_inner
        .iter()
        .zip(y_inner.iter())
        .map(|(x, y)| [*x, *y])
        .collect();
    outline.extend(
        x_outer
            .iter()
            .zip(y_outer.iter())
            .rev()
            .map(|(x, y)| [*x, *y]),
    );
    outline.push(outline[0]);
    outline
}

/// Sensor positions for every (ring, slot), in channel table order.
pub fn sipm_positions(board: &Board, frame: &CoordinateFrame) -> Vec<SipmPosition> {
    let mut positions = Vec::with_capacity(board.channels().len());
    for (ring_idx, ring) in board.rings().iter().enumerate() {
        for slot in 0..board.slot_count() {
            let (x, y) = frame.polar_to_cartesian(ring.radius, board.slot_center(slot));
            positions.push(SipmPosition {
                channel: board.channels()[ring_idx * board.slot_count() + slot],
                ring: ring_idx,
                slot,
                x,
                y,
            });
        }
    }
    positions
}

/// Corners of one tile, inner edge first, counter-clockwise in the local tile frame.
///
/// Returns None if the ring or slot do not exist on this board
pub fn tile_outline(
    board: &Board,
    frame: &CoordinateFrame,
    ring: usize,
    slot: usize,
) -> Option<[[f64; 2]; 4]> {
    if slot >= board.slot_count() {
        return None;
    }
    let tile = board.rings().get(ring)?;
    let half_a = tile.short_width / 2.0;
    let half_b = tile.long_width / 2.0;
    let half_h = tile.tile_height / 2.0;
    let x = array![-half_a, half_a, half_b, -half_b];
    let y = array![-half_h, -half_h, half_h, half_h];

    // Local +y is radial, so turn it onto the slot direction of the frame
    let phi = board.slot_center(slot);
    let (x, y) = frame.rotate(&x, &y, phi - 90.0 + frame.base_rotation());
    let (x, y) = frame.translate(&x, &y, tile.radius, phi);

    Some([[x[0], y[0]], [x[1], y[1]], [x[2], y[2]], [x[3], y[3]]])
}
