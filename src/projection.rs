use rayon::prelude::*;

use crate::court::{self, CourtMark, VERTICAL_OFFSET, X_RANGE, Y_RANGE};
use crate::shot::Shot;

// Below this many shots the rayon split costs more than it saves.
const PARALLEL_THRESHOLD: usize = 4096;
const ARC_SEGMENTS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub const DEFAULT: Surface = Surface {
        width: X_RANGE,
        height: Y_RANGE,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Parses `WxH`, e.g. `500x470`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (w, h) = raw.trim().split_once(['x', 'X'])?;
        let width = w.trim().parse::<f64>().ok()?;
        let height = h.trim().parse::<f64>().ok()?;
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return None;
        }
        Some(Self { width, height })
    }

    pub fn contains(&self, p: SurfacePoint) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Surface coordinates: origin top-left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedShot {
    pub point: SurfacePoint,
    pub made: bool,
}

/// What to do with shots outside the half-court frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfRangePolicy {
    #[default]
    Clamp,
    Reject,
    Allow,
}

impl OutOfRangePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clamp" => Some(Self::Clamp),
            "reject" => Some(Self::Reject),
            "allow" | "off-canvas" => Some(Self::Allow),
            _ => None,
        }
    }
}

/// Maps court units to the surface. The basket lands `VERTICAL_OFFSET * height`
/// below the surface centre so that baseline and half-court line meet the
/// bottom and top edges.
pub fn to_surface(x: f64, y: f64, surface: Surface) -> SurfacePoint {
    SurfacePoint {
        x: (x / X_RANGE) * surface.width + surface.width / 2.0,
        y: surface.height / 2.0 - (y / Y_RANGE) * surface.height
            + VERTICAL_OFFSET * surface.height,
    }
}

/// Projects with the default clamp policy.
pub fn project(shot: &Shot, surface: Surface) -> SurfacePoint {
    let (x, y) = court::clamp(shot.x, shot.y);
    to_surface(x, y, surface)
}

pub fn project_with(shot: &Shot, surface: Surface, policy: OutOfRangePolicy) -> Option<SurfacePoint> {
    match policy {
        OutOfRangePolicy::Clamp => Some(project(shot, surface)),
        OutOfRangePolicy::Reject if !court::contains(shot.x, shot.y) => None,
        OutOfRangePolicy::Reject | OutOfRangePolicy::Allow => {
            Some(to_surface(shot.x, shot.y, surface))
        }
    }
}

/// Projects every shot, keeping input order. Rejected shots are dropped.
pub fn project_all(shots: &[Shot], surface: Surface, policy: OutOfRangePolicy) -> Vec<ProjectedShot> {
    let one = |shot: &Shot| {
        project_with(shot, surface, policy).map(|point| ProjectedShot {
            point,
            made: shot.made,
        })
    };
    if shots.len() < PARALLEL_THRESHOLD {
        shots.iter().filter_map(one).collect()
    } else {
        shots.par_iter().filter_map(one).collect()
    }
}

/// The court diagram as surface polylines.
pub fn project_court(surface: Surface) -> Vec<Vec<SurfacePoint>> {
    court::court_marks()
        .iter()
        .map(|mark: &CourtMark| {
            mark.polyline(ARC_SEGMENTS)
                .into_iter()
                .map(|p| to_surface(p.x, p.y, surface))
                .collect()
        })
        .collect()
}
