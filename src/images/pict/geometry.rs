//! Arc angle conversion and partial-oval bounding boxes
//!
//! PICT arcs are `(start, delta)` in degrees, clockwise from 12 o'clock.
//! Sinks get counter-clockwise angles from 3 o'clock, with `angle0 <= angle1`.

use super::types::{Bounds, PointF};
use smallvec::{SmallVec, smallvec};

const FULL_TURN: f64 = 360.0;

/// Convert a PICT `(start, delta)` pair into normalized sink angles.
pub fn arc_angles(start: i16, delta: i16) -> (f64, f64) {
    let start = f64::from(start);
    let delta = f64::from(delta).clamp(-FULL_TURN, FULL_TURN);
    let (mut angle0, mut angle1) = (90.0 - start - delta, 90.0 - start);
    if delta < 0.0 {
        std::mem::swap(&mut angle0, &mut angle1);
    }
    normalize_angles(angle0, angle1)
}

/// Shift both angles by whole turns until `angle1 <= 360` and `angle0 >= -360`.
pub fn normalize_angles(mut angle0: f64, mut angle1: f64) -> (f64, f64) {
    if !angle0.is_finite() || !angle1.is_finite() {
        return (angle0, angle1);
    }
    while angle1 > FULL_TURN {
        angle0 -= FULL_TURN;
        angle1 -= FULL_TURN;
    }
    while angle0 < -FULL_TURN {
        angle0 += FULL_TURN;
        angle1 += FULL_TURN;
    }
    (angle0, angle1)
}

/// Point on the oval inscribed in `oval` at `degrees`.
pub fn point_on_oval(oval: &Bounds, degrees: f64) -> PointF {
    let center = oval.center();
    let (sin, cos) = degrees.to_radians().sin_cos();
    PointF::new(
        center.x + oval.width() / 2.0 * cos,
        center.y - oval.height() / 2.0 * sin,
    )
}

/// Extent of the arc between `angle0` and `angle1`.
///
/// Samples both end points and every axis crossing in between. Pies also
/// cover the oval's centre.
pub fn arc_bounds(oval: &Bounds, angle0: f64, angle1: f64, include_center: bool) -> Bounds {
    // two end points, at most four axis crossings, the centre
    let mut samples: SmallVec<[PointF; 7]> =
        smallvec![point_on_oval(oval, angle0), point_on_oval(oval, angle1)];
    let mut quadrant = (angle0 / 90.0).ceil() * 90.0;
    while quadrant < angle1 {
        samples.push(point_on_oval(oval, quadrant));
        quadrant += 90.0;
    }
    if include_center {
        samples.push(oval.center());
    }
    Bounds::from_points(samples).unwrap_or(*oval)
}

/// Rectangles covered by a region, from its inversion points.
///
/// Each scanline toggles the x positions it lists; between one scanline and
/// the next, consecutive pairs of active positions are covered.
pub fn region_spans(points: &[PointF]) -> Vec<Bounds> {
    let mut active: Vec<f64> = Vec::new();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < points.len() {
        let y = points[i].y;
        let mut j = i;
        while j < points.len() && points[j].y == y {
            let x = points[j].x;
            match active.iter().position(|&a| a == x) {
                Some(k) => {
                    active.remove(k);
                },
                None => {
                    let k = active.partition_point(|&a| a < x);
                    active.insert(k, x);
                },
            }
            j += 1;
        }
        if let Some(next) = points.get(j) {
            for pair in active.chunks_exact(2) {
                spans.push(Bounds::new(pair[0], y, pair[1], next.y));
            }
        }
        i = j;
    }
    spans
}
