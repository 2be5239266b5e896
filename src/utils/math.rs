use nalgebra::Vector3;
use std::f64::consts::PI;

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Clamp a value into [0, 1]
#[inline]
pub fn clamp01(x: f64) -> f64 {
    if x > 1.0 {
        1.0
    } else if x < 0.0 {
        0.0
    } else {
        x
    }
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * clamp01(factor)
}

/// Ratio `num / den` clamped into [0, 1]; a zero denominator saturates to 1.
#[inline]
pub fn ratio01(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        clamp01(num / den)
    } else {
        1.0
    }
}

/// Zero-guarded vector operations used by the allocator.
///
/// nalgebra's own `normalize` divides by the norm unconditionally, which turns
/// a zero vector into NaNs. Every operation here treats a zero-magnitude
/// operand as "no contribution" instead.
pub trait TorqueVectorExt {
    /// Unit vector, or `None` if the magnitude is zero or not finite.
    fn safe_normalize(&self) -> Option<Vector3<f64>>;

    /// Projection of `self` onto `onto`; zero when `onto` is zero.
    fn project_onto(&self, onto: &Vector3<f64>) -> Vector3<f64>;

    /// Angle between two vectors in degrees, in [0, 180].
    /// Zero when either vector has zero magnitude.
    fn angle_deg(&self, other: &Vector3<f64>) -> f64;
}

impl TorqueVectorExt for Vector3<f64> {
    fn safe_normalize(&self) -> Option<Vector3<f64>> {
        let norm = self.norm();
        if norm > 0.0 && norm.is_finite() {
            Some(self / norm)
        } else {
            None
        }
    }

    fn project_onto(&self, onto: &Vector3<f64>) -> Vector3<f64> {
        let m2 = onto.norm_squared();
        if m2 > 0.0 {
            onto * (self.dot(onto) / m2)
        } else {
            Vector3::zeros()
        }
    }

    fn angle_deg(&self, other: &Vector3<f64>) -> f64 {
        let denom = self.norm() * other.norm();
        if denom <= 0.0 || !denom.is_finite() {
            return 0.0;
        }
        // rounding can push the cosine just outside [-1, 1]
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        rad_to_deg(cos.acos())
    }
}
