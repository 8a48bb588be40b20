//! Half-court geometry in league court units (tenths of a foot, basket at the
//! origin). Both the diagram and the shot projection use these constants.

use std::f64::consts::PI;

pub const SIDELINE_X: f64 = 250.0;
pub const BASELINE_Y: f64 = -47.5;
pub const HALF_COURT_Y: f64 = 422.5;

/// Horizontal extent of the frame, sideline to sideline.
pub const X_RANGE: f64 = 2.0 * SIDELINE_X;
/// Vertical extent of the frame, baseline to half-court line.
pub const Y_RANGE: f64 = HALF_COURT_Y - BASELINE_Y;
/// Court-unit y of the frame centre.
pub const Y_CENTER: f64 = (BASELINE_Y + HALF_COURT_Y) / 2.0;
/// Fraction of surface height the basket sits below the surface centre.
pub const VERTICAL_OFFSET: f64 = Y_CENTER / Y_RANGE;

pub const HOOP_RADIUS: f64 = 7.5;
pub const BACKBOARD_Y: f64 = -7.5;
pub const BACKBOARD_HALF_WIDTH: f64 = 30.0;
pub const RESTRICTED_RADIUS: f64 = 40.0;
pub const KEY_HALF_WIDTH: f64 = 80.0;
pub const FREE_THROW_Y: f64 = 142.5;
pub const FREE_THROW_RADIUS: f64 = 60.0;
pub const THREE_RADIUS: f64 = 237.5;
pub const CORNER_THREE_X: f64 = 220.0;
pub const CENTER_CIRCLE_RADIUS: f64 = 60.0;

/// `y` at which the corner three straightaway meets the arc.
pub fn corner_three_y() -> f64 {
    (THREE_RADIUS * THREE_RADIUS - CORNER_THREE_X * CORNER_THREE_X).sqrt()
}

pub fn contains(x: f64, y: f64) -> bool {
    (-SIDELINE_X..=SIDELINE_X).contains(&x) && (BASELINE_Y..=HALF_COURT_Y).contains(&y)
}

pub fn clamp(x: f64, y: f64) -> (f64, f64) {
    (
        x.clamp(-SIDELINE_X, SIDELINE_X),
        y.clamp(BASELINE_Y, HALF_COURT_Y),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtPoint {
    pub x: f64,
    pub y: f64,
}

impl CourtPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CourtMark {
    Line {
        from: CourtPoint,
        to: CourtPoint,
    },
    /// Angles in degrees, counter-clockwise from +x.
    Arc {
        center: CourtPoint,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
    },
}

impl CourtMark {
    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        CourtMark::Line {
            from: CourtPoint::new(x1, y1),
            to: CourtPoint::new(x2, y2),
        }
    }

    fn arc(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> Self {
        CourtMark::Arc {
            center: CourtPoint::new(cx, cy),
            radius,
            start_deg,
            end_deg,
        }
    }

    /// Samples the mark as a polyline. Arcs use `segments` chords.
    pub fn polyline(&self, segments: usize) -> Vec<CourtPoint> {
        match *self {
            CourtMark::Line { from, to } => vec![from, to],
            CourtMark::Arc {
                center,
                radius,
                start_deg,
                end_deg,
            } => {
                let segments = segments.max(1);
                (0..=segments)
                    .map(|i| {
                        let t = i as f64 / segments as f64;
                        let deg = start_deg + (end_deg - start_deg) * t;
                        let rad = deg * PI / 180.0;
                        CourtPoint::new(
                            center.x + radius * rad.cos(),
                            center.y + radius * rad.sin(),
                        )
                    })
                    .collect()
            }
        }
    }
}

/// Every painted line of the half court.
pub fn court_marks() -> Vec<CourtMark> {
    let corner_y = corner_three_y();
    let arc_start = corner_y.atan2(CORNER_THREE_X) * 180.0 / PI;
    vec![
        // Boundary.
        CourtMark::line(-SIDELINE_X, BASELINE_Y, SIDELINE_X, BASELINE_Y),
        CourtMark::line(-SIDELINE_X, BASELINE_Y, -SIDELINE_X, HALF_COURT_Y),
        CourtMark::line(SIDELINE_X, BASELINE_Y, SIDELINE_X, HALF_COURT_Y),
        CourtMark::line(-SIDELINE_X, HALF_COURT_Y, SIDELINE_X, HALF_COURT_Y),
        // Hoop, backboard and restricted area.
        CourtMark::arc(0.0, 0.0, HOOP_RADIUS, 0.0, 360.0),
        CourtMark::line(
            -BACKBOARD_HALF_WIDTH,
            BACKBOARD_Y,
            BACKBOARD_HALF_WIDTH,
            BACKBOARD_Y,
        ),
        CourtMark::arc(0.0, 0.0, RESTRICTED_RADIUS, 0.0, 180.0),
        // Key.
        CourtMark::line(-KEY_HALF_WIDTH, BASELINE_Y, -KEY_HALF_WIDTH, FREE_THROW_Y),
        CourtMark::line(KEY_HALF_WIDTH, BASELINE_Y, KEY_HALF_WIDTH, FREE_THROW_Y),
        CourtMark::line(-KEY_HALF_WIDTH, FREE_THROW_Y, KEY_HALF_WIDTH, FREE_THROW_Y),
        CourtMark::arc(0.0, FREE_THROW_Y, FREE_THROW_RADIUS, 0.0, 360.0),
        // Three-point line.
        CourtMark::line(-CORNER_THREE_X, BASELINE_Y, -CORNER_THREE_X, corner_y),
        CourtMark::line(CORNER_THREE_X, BASELINE_Y, CORNER_THREE_X, corner_y),
        CourtMark::arc(0.0, 0.0, THREE_RADIUS, arc_start, 180.0 - arc_start),
        // Centre circle, lower half.
        CourtMark::arc(0.0, HALF_COURT_Y, CENTER_CIRCLE_RADIUS, 180.0, 360.0),
    ]
}
