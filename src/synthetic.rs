use rand::Rng;

use crate::court::{BASELINE_Y, HALF_COURT_Y, SIDELINE_X};
use crate::sessions::AccuracySession;
use crate::shot::Shot;
use crate::zones::{Zone, classify};

const MAX_TRIES: usize = 2000;

/// Shot selection and touch for a made-up shooter.
#[derive(Debug, Clone, PartialEq)]
pub struct ShooterProfile {
    /// `(zone, relative weight, make probability)`.
    pub zones: Vec<(Zone, f64, f64)>,
}

impl Default for ShooterProfile {
    fn default() -> Self {
        Self {
            zones: vec![
                (Zone::RestrictedArea, 0.30, 0.62),
                (Zone::Paint, 0.12, 0.42),
                (Zone::MidRange, 0.16, 0.41),
                (Zone::LeftCorner3, 0.06, 0.38),
                (Zone::RightCorner3, 0.06, 0.38),
                (Zone::AboveBreak3, 0.30, 0.35),
            ],
        }
    }
}

impl ShooterProfile {
    pub fn spot_up() -> Self {
        Self {
            zones: vec![
                (Zone::RestrictedArea, 0.10, 0.55),
                (Zone::MidRange, 0.10, 0.45),
                (Zone::LeftCorner3, 0.15, 0.42),
                (Zone::RightCorner3, 0.15, 0.42),
                (Zone::AboveBreak3, 0.50, 0.38),
            ],
        }
    }

    pub fn interior() -> Self {
        Self {
            zones: vec![
                (Zone::RestrictedArea, 0.60, 0.68),
                (Zone::Paint, 0.25, 0.45),
                (Zone::MidRange, 0.12, 0.38),
                (Zone::AboveBreak3, 0.03, 0.25),
            ],
        }
    }

    fn pick<R: Rng>(&self, rng: &mut R) -> Option<(Zone, f64)> {
        let total: f64 = self.zones.iter().map(|(_, w, _)| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = rng.gen_range(0.0..total);
        for (zone, weight, make) in &self.zones {
            let weight = weight.max(0.0);
            if roll < weight {
                return Some((*zone, *make));
            }
            roll -= weight;
        }
        self.zones.last().map(|(z, _, m)| (*z, *m))
    }
}

/// Random location inside `zone`.
pub fn sample_in_zone<R: Rng>(rng: &mut R, zone: Zone) -> (f64, f64) {
    if zone == Zone::Backcourt {
        return (
            rng.gen_range(-SIDELINE_X..=SIDELINE_X),
            rng.gen_range(HALF_COURT_Y + 1.0..HALF_COURT_Y + 200.0),
        );
    }
    for _ in 0..MAX_TRIES {
        let x = rng.gen_range(-SIDELINE_X..=SIDELINE_X).round();
        let y = rng.gen_range(BASELINE_Y..=HALF_COURT_Y).round();
        if classify(x, y) == zone {
            return (x, y);
        }
    }
    anchor(zone)
}

fn anchor(zone: Zone) -> (f64, f64) {
    match zone {
        Zone::RestrictedArea => (0.0, 10.0),
        Zone::Paint => (0.0, 100.0),
        Zone::MidRange => (150.0, 100.0),
        Zone::LeftCorner3 => (-235.0, 10.0),
        Zone::RightCorner3 => (235.0, 10.0),
        Zone::AboveBreak3 => (0.0, 260.0),
        Zone::Backcourt => (0.0, 500.0),
    }
}

pub fn generate_shots<R: Rng>(rng: &mut R, profile: &ShooterProfile, count: usize) -> Vec<Shot> {
    (0..count)
        .filter_map(|_| {
            let (zone, make) = profile.pick(rng)?;
            let (x, y) = sample_in_zone(rng, zone);
            let mut shot = Shot::new(rng.gen_bool(make.clamp(0.0, 1.0)), x, y);
            shot.zone = Some(zone.label().to_string());
            Some(shot)
        })
        .collect()
}

pub fn generate_session<R: Rng>(
    rng: &mut R,
    profile: &ShooterProfile,
    count: usize,
    recorded_at: Option<String>,
) -> AccuracySession {
    AccuracySession {
        recorded_at,
        shots: generate_shots(rng, profile, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::zone_of;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_land_in_their_zone() {
        let mut rng = StdRng::seed_from_u64(7);
        for zone in Zone::ALL {
            for _ in 0..20 {
                let (x, y) = sample_in_zone(&mut rng, zone);
                assert_eq!(classify(x, y), zone, "({x}, {y})");
            }
        }
    }

    #[test]
    fn same_seed_same_session() {
        let profile = ShooterProfile::spot_up();
        let a = generate_shots(&mut StdRng::seed_from_u64(42), &profile, 50);
        let b = generate_shots(&mut StdRng::seed_from_u64(42), &profile, 50);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.iter().all(|s| zone_of(s) != Zone::Paint));
    }

    #[test]
    fn empty_profile_generates_nothing() {
        let profile = ShooterProfile { zones: Vec::new() };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_shots(&mut rng, &profile, 10).is_empty());
    }
}
