use glam::Vec3;
use serde::Deserialize;

use crate::error::CurveError;

/// Step used for the finite-difference tangent fallback.
pub const TANGENT_EPSILON: f32 = 1e-4;

/// Number of samples in the arc-length table.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

/// Knot spacings below this are treated as coincident points.
const MIN_KNOT_SPACING: f32 = 1e-4;

/// Catmull-Rom flavour used between control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveType {
    /// Uniform Catmull-Rom with a tangent scale (0.5 is the classic spline).
    CatmullRom { tension: f32 },
    /// Knot spacing proportional to the square root of the chord length.
    Centripetal,
    /// Knot spacing proportional to the chord length.
    Chordal,
}

impl CurveType {
    pub const DEFAULT_TENSION: f32 = 0.5;

    pub const fn catmull_rom() -> Self {
        CurveType::CatmullRom {
            tension: Self::DEFAULT_TENSION,
        }
    }
}

impl Default for CurveType {
    fn default() -> Self {
        Self::catmull_rom()
    }
}

/// How a consumer maps its progress value onto the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameterization {
    /// Progress is the raw spline parameter; speed varies with point spacing.
    #[default]
    Uniform,
    /// Progress is a fraction of total arc length; constant speed.
    ArcLength,
}

/// Cubic `c0 + c1*w + c2*w^2 + c3*w^3` over one segment.
#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl CubicPoly {
    /// Hermite form from end points and end tangents.
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, tension: f32) -> Self {
        Self::hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1))
    }

    fn non_uniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, exponent: f32) -> Self {
        // exponent applies to the squared distance: 0.25 centripetal, 0.5 chordal
        let mut dt1 = p1.distance_squared(p2).powf(exponent);
        let mut dt0 = p0.distance_squared(p1).powf(exponent);
        let mut dt2 = p2.distance_squared(p3).powf(exponent);

        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        let t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;

        Self::hermite(p1, p2, t1 * dt1, t2 * dt1)
    }

    fn eval(&self, w: f32) -> Vec3 {
        self.c0 + w * (self.c1 + w * (self.c2 + w * self.c3))
    }

    fn derivative(&self, w: f32) -> Vec3 {
        self.c1 + w * (2.0 * self.c2 + w * 3.0 * self.c3)
    }
}

/// Closed Catmull-Rom spline through an ordered, cyclic list of points.
///
/// The curve is immutable: build a new one when the points change. It also
/// carries an arc-length table computed once at construction, which backs the
/// `*_at` constant-speed queries.
#[derive(Debug, Clone)]
pub struct ClosedCurve {
    points: Vec<Vec3>,
    curve_type: CurveType,
    lengths: Vec<f32>,
}

impl ClosedCurve {
    /// Builds a closed curve. Fails with fewer than 3 points or any non-finite coordinate.
    pub fn new(points: Vec<Vec3>, curve_type: CurveType) -> Result<Self, CurveError> {
        if points.len() < 3 {
            return Err(CurveError::TooFewControlPoints { got: points.len() });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(CurveError::NonFiniteControlPoint { index });
        }

        let mut curve = Self {
            points,
            curve_type,
            lengths: Vec::new(),
        };
        curve.lengths = curve.compute_lengths();
        Ok(curve)
    }

    /// Uniform Catmull-Rom with the default tension.
    pub fn catmull_rom(points: Vec<Vec3>) -> Result<Self, CurveError> {
        Self::new(points, CurveType::catmull_rom())
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    /// Approximate total length of the loop.
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at raw parameter `t`; any real `t` is wrapped into [0, 1).
    pub fn position(&self, t: f32) -> Vec3 {
        let (poly, w) = self.segment(t);
        poly.eval(w)
    }

    /// Unit direction of travel at raw parameter `t`.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let (poly, w) = self.segment(t);
        let analytic = poly.derivative(w).normalize_or_zero();
        if analytic != Vec3::ZERO {
            return analytic;
        }
        (self.position(t + TANGENT_EPSILON) - self.position(t)).normalize_or_zero()
    }

    /// Point at arc-length fraction `u`.
    pub fn position_at(&self, u: f32) -> Vec3 {
        self.position(self.u_to_t(u))
    }

    /// Unit direction at arc-length fraction `u`.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        self.tangent(self.u_to_t(u))
    }

    /// Dispatches to the raw or arc-length query.
    pub fn sample(&self, progress: f32, parameterization: Parameterization) -> Vec3 {
        match parameterization {
            Parameterization::Uniform => self.position(progress),
            Parameterization::ArcLength => self.position_at(progress),
        }
    }

    pub fn sample_tangent(&self, progress: f32, parameterization: Parameterization) -> Vec3 {
        match parameterization {
            Parameterization::Uniform => self.tangent(progress),
            Parameterization::ArcLength => self.tangent_at(progress),
        }
    }

    /// Maps an arc-length fraction onto the raw parameter.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let u = wrap_unit(u);
        let total = self.length();
        if total <= 0.0 {
            return u;
        }

        let target = u * total;
        // index of the last sample whose cumulative length is <= target
        let i = self
            .lengths
            .partition_point(|&len| len <= target)
            .saturating_sub(1)
            .min(ARC_LENGTH_DIVISIONS - 1);

        let before = self.lengths[i];
        let segment = self.lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };

        (i as f32 + fraction) / ARC_LENGTH_DIVISIONS as f32
    }

    fn segment(&self, t: f32) -> (CubicPoly, f32) {
        let n = self.points.len();
        let scaled = wrap_unit(t) * n as f32;
        let floor = scaled.floor();
        // floor can round up to n for t just below 1
        let index = (floor as usize) % n;
        let w = scaled - floor;

        let p0 = self.points[(index + n - 1) % n];
        let p1 = self.points[index];
        let p2 = self.points[(index + 1) % n];
        let p3 = self.points[(index + 2) % n];

        let poly = match self.curve_type {
            CurveType::CatmullRom { tension } => CubicPoly::uniform(p0, p1, p2, p3, tension),
            CurveType::Centripetal => CubicPoly::non_uniform(p0, p1, p2, p3, 0.25),
            CurveType::Chordal => CubicPoly::non_uniform(p0, p1, p2, p3, 0.5),
        };
        (poly, w)
    }

    fn compute_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut total = 0.0;
        let mut last = self.position(0.0);
        lengths.push(0.0);

        for i in 1..=ARC_LENGTH_DIVISIONS {
            let point = self.position(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += point.distance(last);
            lengths.push(total);
            last = point;
        }
        lengths
    }
}

/// Wraps any finite value into [0, 1); non-finite values map to 0.
pub fn wrap_unit(t: f32) -> f32 {
    if !t.is_finite() {
        return 0.0;
    }
    let wrapped = t.rem_euclid(1.0);
    // rem_euclid can return exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -10.0),
        ]
    }

    #[test]
    fn rejects_too_few_points() {
        let err = ClosedCurve::catmull_rom(vec![Vec3::ZERO, Vec3::X]).unwrap_err();
        assert_eq!(err, CurveError::TooFewControlPoints { got: 2 });
    }

    #[test]
    fn rejects_non_finite_points() {
        let points = vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::X];
        let err = ClosedCurve::catmull_rom(points).unwrap_err();
        assert_eq!(err, CurveError::NonFiniteControlPoint { index: 1 });
    }

    #[test]
    fn passes_through_control_points() {
        for curve_type in [CurveType::catmull_rom(), CurveType::Centripetal, CurveType::Chordal] {
            let curve = ClosedCurve::new(square(), curve_type).unwrap();
            for (i, point) in square().iter().enumerate() {
                let t = i as f32 / 4.0;
                assert!(curve.position(t).distance(*point) < 1e-4, "{curve_type:?} at {t}");
            }
        }
    }

    #[test]
    fn wraps_parameter() {
        let curve = ClosedCurve::catmull_rom(square()).unwrap();
        assert!(curve.position(1.25).distance(curve.position(0.25)) < 1e-4);
        assert!(curve.position(-0.75).distance(curve.position(0.25)) < 1e-4);
    }

    #[test]
    fn tangent_is_unit_length() {
        let curve = ClosedCurve::catmull_rom(square()).unwrap();
        for i in 0..32 {
            let t = i as f32 / 32.0;
            assert!((curve.tangent(t).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn tangent_follows_counter_clockwise_order() {
        let curve = ClosedCurve::catmull_rom(square()).unwrap();
        // at (10,0,0) heading toward (0,0,10)
        let tangent = curve.tangent(0.0);
        assert!(tangent.z > 0.9);
    }

    #[test]
    fn arc_length_round_trips_at_endpoints() {
        let curve = ClosedCurve::catmull_rom(square()).unwrap();
        assert!(curve.u_to_t(0.0).abs() < 1e-6);
        // symmetric loop: half the length is half the parameter
        assert!((curve.u_to_t(0.5) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn length_of_circle_like_loop() {
        let curve = ClosedCurve::catmull_rom(square()).unwrap();
        let circumference = std::f32::consts::TAU * 10.0;
        let polygon = 4.0 * 200f32.sqrt();
        // bulges past the chords but stays inside the circle
        assert!(curve.length() > polygon);
        assert!(curve.length() < circumference);
    }

    #[test]
    fn wrap_unit_handles_edges() {
        assert_eq!(wrap_unit(0.0), 0.0);
        assert_eq!(wrap_unit(1.0), 0.0);
        assert!((wrap_unit(1.5) - 0.5).abs() < 1e-6);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-6);
        assert_eq!(wrap_unit(f32::NAN), 0.0);
        assert!(wrap_unit(-1e-9) < 1.0);
    }
}
