//! Slider paths.
//!
//! Every path is evaluated through the same parameter: `t` in `[0, 1]` walks
//! the path once at constant speed, and the parameter space is folded so that
//! `t`, `-t` and `t + 2k` land on the same point. A slider with `n` repeats is
//! therefore sampled with `t = repeat_index + progress`.
//!
//! Bézier curves are not constant-speed in their own parameter, so they keep
//! two coordinate systems: the raw Bernstein parameter (t-coordinate, one unit
//! per segment) and the fraction of distance travelled (l-coordinate). The
//! anchor table translates the latter into the former.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use thiserror::Error;

use crate::Vec2;

/// Squared distances and cross products below this are treated as zero.
pub const EPSILON: f64 = 1e-3;

/// Highest Bézier segment degree the factorial table covers.
///
/// Every factorial up to 20! is exactly representable in an `f64`. A segment
/// with more than `MAX_BEZIER_DEGREE + 1` control points is rejected.
pub const MAX_BEZIER_DEGREE: usize = 20;

/// Number of intervals in the l → t anchor table.
pub const ANCHOR_COUNT: usize = 64;

/// Raw-parameter samples per Bézier segment used for length estimation.
pub const SAMPLES_PER_SEGMENT: usize = 64;

const FACTORIALS: [f64; MAX_BEZIER_DEGREE + 1] = [
    1.0,
    1.0,
    2.0,
    6.0,
    24.0,
    120.0,
    720.0,
    5_040.0,
    40_320.0,
    362_880.0,
    3_628_800.0,
    39_916_800.0,
    479_001_600.0,
    6_227_020_800.0,
    87_178_291_200.0,
    1_307_674_368_000.0,
    20_922_789_888_000.0,
    355_687_428_096_000.0,
    6_402_373_705_728_000.0,
    121_645_100_408_832_000.0,
    2_432_902_008_176_640_000.0,
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("a path needs at least 2 control points, got {0}")]
    TooFewPoints(usize),
    #[error("arc points are coincident or collinear")]
    DegenerateArc,
    #[error("bezier segment of degree {degree} exceeds the supported maximum of {max}")]
    DegreeTooHigh { degree: usize, max: usize },
}

/// Curve letter of a slider definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    Linear,
    PerfectArc,
    Bezier,
}

impl CurveKind {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'L' => Some(CurveKind::Linear),
            'P' => Some(CurveKind::PerfectArc),
            'B' => Some(CurveKind::Bezier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Path {
    Linear(Line),
    PerfectArc(Arc),
    Bezier(Bezier),
}

impl Path {
    /// Builds a path from the full list of control points, slider head first.
    ///
    /// A degenerate perfect arc falls back to a line between its first and
    /// last point. Linear paths through more than two points become a chain
    /// of degree-1 Bézier segments, and perfect arcs with a point count other
    /// than three are read as Bézier curves.
    pub fn from_control_points(kind: CurveKind, points: &[Vec2]) -> Result<Path, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints(points.len()));
        }
        let first = points[0];
        let last = points[points.len() - 1];

        match kind {
            CurveKind::Linear if points.len() == 2 => Ok(Path::Linear(Line::new(first, last))),
            CurveKind::Linear => {
                let mut chain = Vec::with_capacity(points.len() * 2 - 2);
                chain.push(first);
                for p in &points[1..points.len() - 1] {
                    chain.push(*p);
                    chain.push(*p);
                }
                chain.push(last);
                Ok(Path::Bezier(Bezier::new(&chain)?))
            }
            CurveKind::PerfectArc if points.len() == 3 => {
                match Arc::through(points[0], points[1], points[2]) {
                    Ok(arc) => Ok(Path::PerfectArc(arc)),
                    Err(PathError::DegenerateArc) => {
                        debug!("degenerate arc through {points:?}, using a line instead");
                        Ok(Path::Linear(Line::new(first, last)))
                    }
                    Err(e) => Err(e),
                }
            }
            CurveKind::PerfectArc | CurveKind::Bezier => Ok(Path::Bezier(Bezier::new(points)?)),
        }
    }

    /// Position at parameter `t`, folded into `[0, 1]`.
    pub fn evaluate(&self, t: f64) -> Vec2 {
        let (l, _) = fold(t);
        match self {
            Path::Linear(line) => line.at(l),
            Path::PerfectArc(arc) => arc.at(l),
            Path::Bezier(bezier) => bezier.at(l),
        }
    }

    /// Derivative at parameter `t`, pointing in the direction of travel.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let (l, backwards) = fold(t);
        let d = match self {
            Path::Linear(line) => line.derive(l),
            Path::PerfectArc(arc) => arc.derive(l),
            Path::Bezier(bezier) => bezier.derive(l),
        };
        if backwards { -d } else { d }
    }

    pub fn length(&self) -> f64 {
        match self {
            Path::Linear(line) => line.length(),
            Path::PerfectArc(arc) => arc.length(),
            Path::Bezier(bezier) => bezier.length(),
        }
    }

    /// Stretches or shrinks the path so that one traversal covers `target`.
    pub fn normalize(&mut self, target: f64) {
        match self {
            Path::Linear(line) => line.normalize(target),
            Path::PerfectArc(arc) => arc.normalize(target),
            Path::Bezier(bezier) => bezier.normalize(target),
        }
    }
}

/// Maps any real parameter onto `[0, 1]`, reporting whether it fell on a
/// return pass.
fn fold(t: f64) -> (f64, bool) {
    let t = t.abs().rem_euclid(2.0);
    if t > 1.0 { (2.0 - t, true) } else { (t, false) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn at(&self, l: f64) -> Vec2 {
        self.start.lerp(self.end, l)
    }

    pub fn derive(&self, _l: f64) -> Vec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn normalize(&mut self, target: f64) {
        let length = self.length();
        if length < EPSILON {
            debug!("cannot stretch a zero-length line to {target}");
            return;
        }
        self.end = self.start + (self.end - self.start) * (target / length);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Vec2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    /// Circle arc starting at `start`, passing through `pass`, ending at `end`.
    pub fn through(start: Vec2, pass: Vec2, end: Vec2) -> Result<Arc, PathError> {
        let a2 = (pass - end).length_squared();
        let b2 = (start - end).length_squared();
        let c2 = (start - pass).length_squared();
        if a2 < EPSILON || b2 < EPSILON || c2 < EPSILON {
            return Err(PathError::DegenerateArc);
        }

        let direction = (end - start).cross(pass - start);
        if direction.abs() < EPSILON {
            return Err(PathError::DegenerateArc);
        }

        let wa = a2 * (b2 + c2 - a2);
        let wb = b2 * (a2 + c2 - b2);
        let wc = c2 * (a2 + b2 - c2);
        let sum = wa + wb + wc;
        if sum.abs() < EPSILON {
            return Err(PathError::DegenerateArc);
        }
        let center = (start * wa + pass * wb + end * wc) / sum;
        let radius = start.distance(center);

        let from_start = start - center;
        let from_end = end - center;
        let start_angle = from_start.y.atan2(from_start.x);
        let mut end_angle = from_end.y.atan2(from_end.x);

        // Positive direction means the pass-through point is reached
        // clockwise in mathematical orientation, so angles decrease.
        if direction > 0.0 {
            if end_angle > start_angle {
                end_angle -= TAU;
            }
        } else if end_angle < start_angle {
            end_angle += TAU;
        }

        Ok(Arc {
            center,
            radius,
            start_angle,
            end_angle,
        })
    }

    pub fn at(&self, l: f64) -> Vec2 {
        let angle = self.start_angle + (self.end_angle - self.start_angle) * l;
        self.center + Vec2::from_angle(angle) * self.radius
    }

    pub fn derive(&self, l: f64) -> Vec2 {
        let span = self.end_angle - self.start_angle;
        let angle = self.start_angle + span * l;
        Vec2::new(-angle.sin(), angle.cos()) * (self.radius * span)
    }

    pub fn length(&self) -> f64 {
        self.radius * (self.end_angle - self.start_angle).abs()
    }

    pub fn normalize(&mut self, target: f64) {
        let span = self.end_angle - self.start_angle;
        self.end_angle = self.start_angle + span.signum() * target / self.radius;
    }
}

/// Composite Bézier curve.
///
/// Segment `k` is `control_points[indices[k]..indices[k + 1]]`. Consecutive
/// segments share their junction point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bezier {
    control_points: Vec<Vec2>,
    indices: Vec<usize>,
    /// `anchors[k]` is the raw parameter reached after `k / ANCHOR_COUNT` of
    /// the effective length.
    anchors: Vec<f64>,
    length: f64,
    curve_length: f64,
}

impl Bezier {
    /// Splits `points` on repeated control points and builds the anchor table
    /// for the curve's own length.
    pub fn new(points: &[Vec2]) -> Result<Bezier, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewPoints(points.len()));
        }

        let mut indices = vec![0];
        for i in 1..points.len() {
            let last_cut = indices[indices.len() - 1];
            // a cut must leave at least two points on both sides
            if points[i] == points[i - 1] && i - last_cut >= 2 && points.len() - i >= 2 {
                indices.push(i);
            }
        }
        indices.push(points.len());

        for bounds in indices.windows(2) {
            let degree = bounds[1] - bounds[0] - 1;
            if degree > MAX_BEZIER_DEGREE {
                return Err(PathError::DegreeTooHigh {
                    degree,
                    max: MAX_BEZIER_DEGREE,
                });
            }
        }

        let mut bezier = Bezier {
            control_points: points.to_vec(),
            indices,
            anchors: Vec::new(),
            length: 0.0,
            curve_length: 0.0,
        };
        bezier.build_anchors(f64::INFINITY);
        Ok(bezier)
    }

    pub fn control_points(&self) -> &[Vec2] {
        &self.control_points
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn anchors(&self) -> &[f64] {
        &self.anchors
    }

    pub fn segment_count(&self) -> usize {
        self.indices.len() - 1
    }

    /// Effective length after normalization.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Length of the whole curve described by the control points.
    pub fn curve_length(&self) -> f64 {
        self.curve_length
    }

    pub fn at(&self, l: f64) -> Vec2 {
        self.raw_at(self.l_to_t(l).0)
    }

    pub fn derive(&self, l: f64) -> Vec2 {
        let (t, dt_dl) = self.l_to_t(l);
        self.raw_derive(t) * dt_dl
    }

    /// Rebuilds the anchor table so that l = 1 lands after `target` units.
    ///
    /// The curve is truncated when `target` is shorter than the curve. It is
    /// never extended: a longer target keeps the full curve.
    pub fn normalize(&mut self, target: f64) {
        if target > self.curve_length + EPSILON {
            warn!(
                "bezier path is {:.3} long, cannot extend it to {:.3}",
                self.curve_length, target
            );
        }
        self.build_anchors(target);
    }

    /// Raw parameter for `l`, with the local slope dt/dl.
    fn l_to_t(&self, l: f64) -> (f64, f64) {
        let x = l.clamp(0.0, 1.0) * ANCHOR_COUNT as f64;
        let i = (x.floor() as usize).min(ANCHOR_COUNT - 1);
        let frac = x - i as f64;
        let delta = self.anchors[i + 1] - self.anchors[i];
        (self.anchors[i] + delta * frac, delta * ANCHOR_COUNT as f64)
    }

    fn segment(&self, t: f64) -> (&[Vec2], f64) {
        let count = self.segment_count();
        let index = (t.max(0.0).floor() as usize).min(count - 1);
        let points = &self.control_points[self.indices[index]..self.indices[index + 1]];
        (points, t - index as f64)
    }

    fn raw_at(&self, t: f64) -> Vec2 {
        let (points, u) = self.segment(t);
        bernstein(points, u)
    }

    fn raw_derive(&self, t: f64) -> Vec2 {
        let (points, u) = self.segment(t);
        let degree = points.len() - 1;
        if degree == 0 {
            return Vec2::ZERO;
        }
        let deltas: Vec<Vec2> = points.windows(2).map(|w| w[1] - w[0]).collect();
        bernstein(&deltas, u) * degree as f64
    }

    fn build_anchors(&mut self, target: f64) {
        let steps = SAMPLES_PER_SEGMENT * self.segment_count();
        let t_max = self.segment_count() as f64;

        let mut params = Vec::with_capacity(steps + 1);
        let mut distances = Vec::with_capacity(steps + 1);
        let mut previous = self.raw_at(0.0);
        let mut travelled = 0.0;
        params.push(0.0);
        distances.push(0.0);
        for j in 1..=steps {
            let t = j as f64 / SAMPLES_PER_SEGMENT as f64;
            let point = self.raw_at(t);
            travelled += previous.distance(point);
            previous = point;
            params.push(t);
            distances.push(travelled);
        }

        self.curve_length = travelled;
        self.length = target.min(travelled);
        self.anchors.clear();

        if travelled < EPSILON {
            self.anchors
                .extend((0..=ANCHOR_COUNT).map(|k| t_max * k as f64 / ANCHOR_COUNT as f64));
            return;
        }

        let mut j = 0;
        for k in 0..=ANCHOR_COUNT {
            let wanted = self.length * k as f64 / ANCHOR_COUNT as f64;
            while j + 1 < distances.len() && distances[j + 1] < wanted {
                j += 1;
            }
            let t = if j + 1 >= distances.len() {
                t_max
            } else {
                let span = distances[j + 1] - distances[j];
                if span > 0.0 {
                    params[j] + (wanted - distances[j]) / span * (params[j + 1] - params[j])
                } else {
                    params[j]
                }
            };
            self.anchors.push(t.min(t_max));
        }
        if self.length >= travelled {
            self.anchors[ANCHOR_COUNT] = t_max;
        }
    }
}

fn binomial(n: usize, k: usize) -> f64 {
    FACTORIALS[n] / (FACTORIALS[k] * FACTORIALS[n - k])
}

/// Explicit Bernstein sum over `points` at `u` in `[0, 1]`.
fn bernstein(points: &[Vec2], u: f64) -> Vec2 {
    let degree = points.len() - 1;
    let mut sum = Vec2::ZERO;
    for (i, p) in points.iter().enumerate() {
        let weight = binomial(degree, i) * (1.0 - u).powi((degree - i) as i32) * u.powi(i as i32);
        sum = sum + *p * weight;
    }
    sum
}
