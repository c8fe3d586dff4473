use geo_types::{coord, Coord};
use nalgebra::Matrix3;
use nalgebra::{Affine2, Point2 as NPoint2, RealField};
use num_traits::Float;
use std::f64::consts::PI;

/// A 2D affine transform. The six SVG coefficients `(a, b, c, d, e, f)` map a
/// point as `x' = a*x + c*y + e` and `y' = b*x + d*y + f`.
///
/// Every helper in here returns a new matrix; nothing is mutated in place.
pub type AffineMatrix = Affine2<f64>;

/// Helper to create a scaling matrix
pub fn scale_matrix<T>(sx: T, sy: T) -> Affine2<T>
where
    T: RealField,
    T: Float,
{
    Affine2::from_matrix_unchecked(Matrix3::<T>::new(
        sx,
        T::zero(),
        T::zero(),
        T::zero(),
        sy,
        T::zero(),
        T::zero(),
        T::zero(),
        T::one(),
    ))
}

/// Helper to create a translation matrix
pub fn translate_matrix<T>(tx: T, ty: T) -> Affine2<T>
where
    T: RealField,
    T: Float,
{
    Affine2::from_matrix_unchecked(Matrix3::<T>::new(
        T::one(),
        T::zero(),
        tx,
        T::zero(),
        T::one(),
        ty,
        T::zero(),
        T::zero(),
        T::one(),
    ))
}

/// Standard orientation, radians. In a y-down document this turns clockwise.
pub fn rotate_matrix<T>(radians: T) -> Affine2<T>
where
    T: RealField,
    T: Float,
{
    Affine2::from_matrix_unchecked(Matrix3::<T>::new(
        Float::cos(radians),
        Float::sin(radians).neg(),
        T::zero(),
        Float::sin(radians),
        Float::cos(radians),
        T::zero(),
        T::zero(),
        T::zero(),
        T::one(),
    ))
}

/// Unit matrix. Basically a no-op
pub fn unit_matrix() -> AffineMatrix {
    Affine2::from_matrix_unchecked(Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0))
}

/// Build a matrix from the SVG `matrix(a b c d e f)` coefficients.
pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> AffineMatrix {
    Affine2::from_matrix_unchecked(Matrix3::new(a, c, e, b, d, f, 0.0, 0.0, 1.0))
}

/// The SVG `(a, b, c, d, e, f)` coefficients of a matrix.
pub fn coefficients(m: &AffineMatrix) -> [f64; 6] {
    let raw = m.matrix();
    [
        raw[(0, 0)],
        raw[(1, 0)],
        raw[(0, 1)],
        raw[(1, 1)],
        raw[(0, 2)],
        raw[(1, 2)],
    ]
}

/// `outer · inner`: `inner` is applied to a point first.
pub fn compose(outer: &AffineMatrix, inner: &AffineMatrix) -> AffineMatrix {
    outer * inner
}

/// `m` followed (closer to the point) by a translation, like `DOMMatrix.translate`.
pub fn translate(m: &AffineMatrix, tx: f64, ty: f64) -> AffineMatrix {
    compose(m, &translate_matrix(tx, ty))
}

pub fn scale(m: &AffineMatrix, sx: f64, sy: f64) -> AffineMatrix {
    compose(m, &scale_matrix(sx, sy))
}

/// Rotation in degrees, about the origin.
pub fn rotate(m: &AffineMatrix, degrees: f64) -> AffineMatrix {
    compose(m, &rotate_matrix(degrees_to_radians(degrees)))
}

/// Mirror across the y axis (x → -x).
pub fn flip_x(m: &AffineMatrix) -> AffineMatrix {
    scale(m, -1.0, 1.0)
}

/// Mirror across the x axis (y → -y).
pub fn flip_y(m: &AffineMatrix) -> AffineMatrix {
    scale(m, 1.0, -1.0)
}

pub fn skew_x(m: &AffineMatrix, degrees: f64) -> AffineMatrix {
    let t = degrees_to_radians(degrees).tan();
    compose(m, &from_coefficients(1.0, 0.0, t, 1.0, 0.0, 0.0))
}

pub fn skew_y(m: &AffineMatrix, degrees: f64) -> AffineMatrix {
    let t = degrees_to_radians(degrees).tan();
    compose(m, &from_coefficients(1.0, t, 0.0, 1.0, 0.0, 0.0))
}

pub fn transform_point(m: &AffineMatrix, xy: Coord<f64>) -> Coord<f64> {
    let out = m * NPoint2::new(xy.x, xy.y);
    coord!(x: out.x, y: out.y)
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    PI * (degrees / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Coord<f64>, b: Coord<f64>) -> bool {
        (a.x - b.x).abs() < 1e-8 && (a.y - b.y).abs() < 1e-8
    }

    #[test]
    fn test_translate() {
        let tx = translate_matrix(10., 5.);
        let out = transform_point(&tx, coord! {x: 25., y: 25.});
        assert!(close(out, coord! {x: 35., y: 30.}));
    }

    #[test]
    fn test_simple_rotate() {
        for (degrees, source, destination) in vec![
            (90., coord! {x: 1., y: 0.}, coord! {x: 0., y: 1.}),
            (180., coord! {x: 1., y: 0.}, coord! {x: -1., y: 0.}),
            (90., coord! {x: 0., y: 1.}, coord! {x: -1., y: 0.}),
            (
                45.,
                coord! {x: 1., y: 0.},
                coord! {x: 0.7071067811865476, y: 0.7071067811865476},
            ),
            (
                -45.,
                coord! {x: 1., y: 0.},
                coord! {x: 0.7071067811865476, y: -0.7071067811865476},
            ),
        ] {
            let out = transform_point(&rotate(&unit_matrix(), degrees), source);
            assert!(close(out, destination), "{:?} != {:?}", out, destination);
        }
    }

    #[test]
    fn test_coefficients_roundtrip() {
        let m = from_coefficients(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(coefficients(&m), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        // x' = a*x + c*y + e, y' = b*x + d*y + f
        let out = transform_point(&m, coord! {x: 1.0, y: 1.0});
        assert!(close(out, coord! {x: 9.0, y: 12.0}));
    }

    #[test]
    fn test_compose_is_associative() {
        let a = rotate(&translate_matrix(3.0, -7.0), 33.0);
        let b = from_coefficients(1.5, 0.2, -0.4, 0.8, 12.0, 1.0);
        let c = skew_x(&scale_matrix(2.0, 0.5), 10.0);
        let left = compose(&compose(&a, &b), &c);
        let right = compose(&a, &compose(&b, &c));
        for pt in [
            coord! {x: 0.0, y: 0.0},
            coord! {x: 13.5, y: -2.25},
            coord! {x: -100.0, y: 42.0},
        ] {
            assert!(close(transform_point(&left, pt), transform_point(&right, pt)));
        }
    }

    #[test]
    fn test_compose_order() {
        // translate then scale is not scale then translate
        let ts = translate(&unit_matrix(), 10.0, 0.0);
        let ts = scale(&ts, 2.0, 2.0);
        let out = transform_point(&ts, coord! {x: 1.0, y: 1.0});
        assert!(close(out, coord! {x: 12.0, y: 2.0}));
    }

    #[test]
    fn test_mirrors() {
        let p = coord! {x: 3.0, y: 4.0};
        assert!(close(transform_point(&flip_x(&unit_matrix()), p), coord! {x: -3.0, y: 4.0}));
        assert!(close(transform_point(&flip_y(&unit_matrix()), p), coord! {x: 3.0, y: -4.0}));
    }
}
