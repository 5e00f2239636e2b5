use nalgebra::{Point3, Rotation3, Unit, Vector3};
use std::f64::consts::PI;

/// Signed dihedral angle `p1-p2-p3-p4` in radians, in `(-π, π]`.
///
/// Returns 0 when either plane is degenerate (collinear atoms).
pub fn dihedral_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let b2_norm = b2.norm();
    if b2_norm < 1e-12 || n1.norm_squared() < 1e-24 || n2.norm_squared() < 1e-24 {
        return 0.0;
    }

    let x = n1.dot(&n2);
    let y = b2_norm * b1.dot(&n2);
    normalize_angle(y.atan2(x))
}

/// Wraps an angle into `(-π, π]`. Angles already inside the interval are
/// returned unchanged.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}

/// Rotates `point` by `angle` radians about the axis through `origin` along
/// `axis` (right-hand rule).
pub fn rotate_about_axis(
    point: &Point3<f64>,
    origin: &Point3<f64>,
    axis: &Vector3<f64>,
    angle: f64,
) -> Point3<f64> {
    let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle);
    origin + rotation * (point - origin)
}

/// Unweighted centroid; the origin for an empty slice.
pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, point| acc + point.coords);
    Point3::from(sum / points.len() as f64)
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}
