use serde::Serialize;

use crate::court::{
    CORNER_THREE_X, FREE_THROW_Y, HALF_COURT_Y, KEY_HALF_WIDTH, RESTRICTED_RADIUS, THREE_RADIUS,
    corner_three_y,
};
use crate::shot::{Shot, fg_pct};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Zone {
    RestrictedArea,
    Paint,
    MidRange,
    LeftCorner3,
    RightCorner3,
    AboveBreak3,
    Backcourt,
}

impl Zone {
    pub const ALL: [Zone; 7] = [
        Zone::RestrictedArea,
        Zone::Paint,
        Zone::MidRange,
        Zone::LeftCorner3,
        Zone::RightCorner3,
        Zone::AboveBreak3,
        Zone::Backcourt,
    ];

    /// League `SHOT_ZONE_BASIC` label.
    pub fn label(self) -> &'static str {
        match self {
            Zone::RestrictedArea => "Restricted Area",
            Zone::Paint => "In The Paint (Non-RA)",
            Zone::MidRange => "Mid-Range",
            Zone::LeftCorner3 => "Left Corner 3",
            Zone::RightCorner3 => "Right Corner 3",
            Zone::AboveBreak3 => "Above the Break 3",
            Zone::Backcourt => "Backcourt",
        }
    }

    pub fn from_label(label: &str) -> Option<Zone> {
        let label = label.trim();
        Zone::ALL
            .into_iter()
            .find(|z| z.label().eq_ignore_ascii_case(label))
    }

    pub fn is_three(self) -> bool {
        matches!(
            self,
            Zone::LeftCorner3 | Zone::RightCorner3 | Zone::AboveBreak3 | Zone::Backcourt
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Zone from location alone.
pub fn classify(x: f64, y: f64) -> Zone {
    if y > HALF_COURT_Y {
        return Zone::Backcourt;
    }
    let dist = (x * x + y * y).sqrt();
    if x.abs() >= CORNER_THREE_X && y <= corner_three_y() {
        return if x < 0.0 {
            Zone::LeftCorner3
        } else {
            Zone::RightCorner3
        };
    }
    if dist > THREE_RADIUS {
        return Zone::AboveBreak3;
    }
    if dist <= RESTRICTED_RADIUS {
        return Zone::RestrictedArea;
    }
    if x.abs() <= KEY_HALF_WIDTH && y <= FREE_THROW_Y {
        return Zone::Paint;
    }
    Zone::MidRange
}

/// Recorded league zone when present, location otherwise.
pub fn zone_of(shot: &Shot) -> Zone {
    shot.zone
        .as_deref()
        .and_then(Zone::from_label)
        .unwrap_or_else(|| classify(shot.x, shot.y))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneLine {
    pub zone: Zone,
    pub attempts: usize,
    pub makes: usize,
}

impl ZoneLine {
    pub fn fg_pct(&self) -> Option<f64> {
        fg_pct(self.makes, self.attempts)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    lines: [ZoneLine; 7],
}

impl Default for ZoneSummary {
    fn default() -> Self {
        Self {
            lines: Zone::ALL.map(|zone| ZoneLine {
                zone,
                attempts: 0,
                makes: 0,
            }),
        }
    }
}

impl ZoneSummary {
    pub fn from_shots(shots: &[Shot]) -> Self {
        let mut out = Self::default();
        for shot in shots {
            let line = &mut out.lines[zone_of(shot).index()];
            line.attempts += 1;
            if shot.made {
                line.makes += 1;
            }
        }
        out
    }

    pub fn line(&self, zone: Zone) -> &ZoneLine {
        &self.lines[zone.index()]
    }

    pub fn lines(&self) -> &[ZoneLine] {
        &self.lines
    }

    pub fn attempts(&self) -> usize {
        self.lines.iter().map(|l| l.attempts).sum()
    }

    pub fn makes(&self) -> usize {
        self.lines.iter().map(|l| l.makes).sum()
    }

    pub fn fg_pct(&self) -> Option<f64> {
        fg_pct(self.makes(), self.attempts())
    }

    /// Effective FG%: threes count one and a half makes.
    pub fn efg_pct(&self) -> Option<f64> {
        let attempts = self.attempts();
        if attempts == 0 {
            return None;
        }
        let threes: usize = self
            .lines
            .iter()
            .filter(|l| l.zone.is_three())
            .map(|l| l.makes)
            .sum();
        Some(100.0 * (self.makes() as f64 + 0.5 * threes as f64) / attempts as f64)
    }

    /// Fraction of all attempts taken from `zone`, in `[0, 1]`.
    pub fn attempt_share(&self, zone: Zone) -> f64 {
        let total = self.attempts();
        if total == 0 {
            return 0.0;
        }
        self.line(zone).attempts as f64 / total as f64
    }
}
