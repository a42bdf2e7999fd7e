//! Coordinate frames for the tileboard.
//!
//! A [`CoordinateFrame`] maps between the polar system of the board (radius in mm,
//! angle in degrees measured from the board's reference line) and a Cartesian system
//! that is shifted by an origin offset and turned by a base rotation. The same type
//! describes both the board's own frame and the session frame of a test-beam setup,
//! where the origin is wherever the beam was found to hit the board.
//!
//! Angles handed out by this module are always normalized into `(-180, 180]`.
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_ROTATION: f64 = 90.0;

/// Fold an angle in degrees into the canonical range `(-180, 180]`
pub fn normalize_angle(phi: f64) -> f64 {
    let wrapped = phi % 360.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// An immutable 2D frame with an origin offset and a base rotation (degrees).
///
/// With the default base rotation of 90 degrees an angle of zero points along +y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFrame {
    origin: [f64; 2],
    base_rotation: f64,
}

impl Default for CoordinateFrame {
    /// The board frame: no offset, zero angle along +y
    fn default() -> Self {
        Self::local()
    }
}

impl CoordinateFrame {
    pub fn new(origin: [f64; 2], base_rotation: f64) -> Self {
        Self {
            origin,
            base_rotation,
        }
    }

    /// The unshifted board-local frame used for tile classification
    pub fn local() -> Self {
        Self::new([0.0, 0.0], DEFAULT_BASE_ROTATION)
    }

    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    pub fn base_rotation(&self) -> f64 {
        self.base_rotation
    }

    /// Convert a polar coordinate (r, phi in degrees) to Cartesian (x, y).
    pub fn polar_to_cartesian(&self, r: f64, phi: f64) -> (f64, f64) {
        let angle = (phi + self.base_rotation).to_radians();
        (
            r * angle.cos() + self.origin[0],
            r * angle.sin() + self.origin[1],
        )
    }

    /// Convert a Cartesian coordinate (x, y) to polar (r, phi in degrees).
    ///
    /// A point sitting exactly on the origin has no defined angle and is reported
    /// as `(0, 0)`.
    pub fn cartesian_to_polar(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.origin[0];
        let dy = y - self.origin[1];
        let r = dx.hypot(dy);
        if r == 0.0 {
            return (0.0, 0.0);
        }
        let phi = dy.atan2(dx).to_degrees() - self.base_rotation;
        (r, normalize_angle(phi))
    }

    /// Elementwise [`CoordinateFrame::polar_to_cartesian`].
    ///
    /// Panics if `r` and `phi` have different lengths.
    pub fn polar_to_cartesian_array(
        &self,
        r: &Array1<f64>,
        phi: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let angle = (phi + self.base_rotation).mapv(f64::to_radians);
        let x = r * &angle.mapv(f64::cos) + self.origin[0];
        let y = r * &angle.mapv(f64::sin) + self.origin[1];
        (x, y)
    }

    /// Elementwise [`CoordinateFrame::cartesian_to_polar`].
    ///
    /// Panics if `x` and `y` have different lengths.
    pub fn cartesian_to_polar_array(
        &self,
        x: &Array1<f64>,
        y: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let mut r = Array1::<f64>::zeros(x.len());
        let mut phi = Array1::<f64>::zeros(x.len());
        Zip::from(&mut r)
            .and(&mut phi)
            .and(x)
            .and(y)
            .for_each(|r, phi, &x, &y| {
                (*r, *phi) = self.cartesian_to_polar(x, y);
            });
        (r, phi)
    }

    /// Rotate a set of points around (0, 0) by phi degrees.
    ///
    /// Neither the origin offset nor the base rotation of the frame take part.
    pub fn rotate(
        &self,
        x: &Array1<f64>,
        y: &Array1<f64>,
        phi: f64,
    ) -> (Array1<f64>, Array1<f64>) {
        let (sin, cos) = phi.to_radians().sin_cos();
        let x1 = x * cos - y * sin;
        let y1 = x * sin + y * cos;
        (x1, y1)
    }

    /// Shift a set of points by the polar offset (r, phi) expressed in this frame.
    ///
    /// The offset goes through [`CoordinateFrame::polar_to_cartesian`], so the frame
    /// origin is part of the shift.
    pub fn translate(
        &self,
        x: &Array1<f64>,
        y: &Array1<f64>,
        r: f64,
        phi: f64,
    ) -> (Array1<f64>, Array1<f64>) {
        let (dx, dy) = self.polar_to_cartesian(r, phi);
        (x + dx, y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn angle_difference(a: f64, b: f64) -> f64 {
        normalize_angle(a - b).abs()
    }

    #[test]
    fn test_normalize_angle() {
        assert_abs_diff_eq!(normalize_angle(0.0), 0.0);
        assert_abs_diff_eq!(normalize_angle(180.0), 180.0);
        assert_abs_diff_eq!(normalize_angle(-180.0), 180.0);
        assert_abs_diff_eq!(normalize_angle(270.0), -90.0);
        assert_abs_diff_eq!(normalize_angle(-270.0), 90.0);
        assert_abs_diff_eq!(normalize_angle(725.0), 5.0);
        assert_abs_diff_eq!(normalize_angle(-725.0), -5.0);
        assert!(normalize_angle(f64::NAN).is_nan());
    }

    #[test]
    fn test_polar_to_cartesian_default_frame() {
        let frame = CoordinateFrame::default();
        let (x, y) = frame.polar_to_cartesian(10.0, 0.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 10.0, epsilon = 1e-12);

        // Positive angles turn counter-clockwise, towards -x
        let (x, y) = frame.polar_to_cartesian(10.0, 90.0);
        assert_abs_diff_eq!(x, -10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polar_to_cartesian_with_origin() {
        let frame = CoordinateFrame::new([0.0, -1791.1], 90.0);
        let (x, y) = frame.polar_to_cartesian(1791.1, 0.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cartesian_to_polar_all_quadrants() {
        let frame = CoordinateFrame::new([0.0, 0.0], 0.0);
        let cases = [
            ((1.0, 0.0), 0.0),
            ((0.0, 1.0), 90.0),
            ((-1.0, 0.0), 180.0),
            ((0.0, -1.0), -90.0),
            ((-1.0, -1.0), -135.0),
            ((-1.0, 1.0), 135.0),
        ];
        for ((x, y), expected) in cases {
            let (r, phi) = frame.cartesian_to_polar(x, y);
            assert_abs_diff_eq!(r, x.hypot(y), epsilon = 1e-12);
            assert!(angle_difference(phi, expected) < 1e-9, "{phi} != {expected}");
        }
    }

    #[test]
    fn test_cartesian_to_polar_on_vertical_axis() {
        // x == origin.x must not divide by zero
        let frame = CoordinateFrame::new([3.0, 4.0], 90.0);
        let (r, phi) = frame.cartesian_to_polar(3.0, 9.0);
        assert_abs_diff_eq!(r, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(phi, 0.0, epsilon = 1e-12);

        let (r, phi) = frame.cartesian_to_polar(3.0, -1.0);
        assert_abs_diff_eq!(r, 5.0, epsilon = 1e-12);
        assert!(angle_difference(phi, 180.0) < 1e-12);
    }

    #[test]
    fn test_cartesian_to_polar_at_origin() {
        let frame = CoordinateFrame::new([-361.4, -2306.2], 90.0);
        assert_eq!(frame.cartesian_to_polar(-361.4, -2306.2), (0.0, 0.0));
    }

    #[test]
    fn test_round_trip() {
        let frames = [
            CoordinateFrame::default(),
            CoordinateFrame::new([-361.4, -2306.2], 90.0),
            CoordinateFrame::new([12.5, 7.0], -33.0),
        ];
        for frame in frames {
            for r in [0.5, 1.0, 150.0, 1554.19] {
                for phi in [-359.0, -179.0, -90.0, -4.375, 0.0, 4.375, 90.0, 179.0, 400.0] {
                    let (x, y) = frame.polar_to_cartesian(r, phi);
                    let (r1, phi1) = frame.cartesian_to_polar(x, y);
                    assert_abs_diff_eq!(r1, r, epsilon = 1e-9);
                    assert!(
                        angle_difference(phi1, phi) < 1e-9,
                        "phi {phi} came back as {phi1}"
                    );
                    assert!(phi1 > -180.0 && phi1 <= 180.0);
                }
            }
        }
    }

    #[test]
    fn test_array_conversions_match_scalar() {
        let frame = CoordinateFrame::new([-361.4, -2306.2], 90.0);
        let r = array![1554.19, 1588.47, 1623.515];
        let phi = array![-4.375, 0.625, 3.125];
        let (x, y) = frame.polar_to_cartesian_array(&r, &phi);
        for idx in 0..r.len() {
            let (sx, sy) = frame.polar_to_cartesian(r[idx], phi[idx]);
            assert_abs_diff_eq!(x[idx], sx, epsilon = 1e-9);
            assert_abs_diff_eq!(y[idx], sy, epsilon = 1e-9);
        }

        let (r1, phi1) = frame.cartesian_to_polar_array(&x, &y);
        for idx in 0..r.len() {
            assert_abs_diff_eq!(r1[idx], r[idx], epsilon = 1e-9);
            assert_abs_diff_eq!(phi1[idx], phi[idx], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotate_ignores_frame() {
        let frame = CoordinateFrame::new([100.0, 100.0], 45.0);
        let (x, y) = frame.rotate(&array![1.0, 0.0], &array![0.0, 2.0], 90.0);
        assert_abs_diff_eq!(x[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_translate_uses_frame() {
        let frame = CoordinateFrame::new([1.0, 2.0], 90.0);
        let (x, y) = frame.translate(&array![0.0, 5.0], &array![0.0, 5.0], 10.0, 0.0);
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y[0], 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y[1], 17.0, epsilon = 1e-12);
    }
}
