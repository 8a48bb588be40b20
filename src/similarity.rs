use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::roster::Roster;
use crate::shot::{Player, Shot};
use crate::store::PlayerRecordStore;
use crate::zones::{Zone, ZoneSummary};

// Accuracy differences count less than shot-selection differences.
const PCT_WEIGHT: f64 = 0.5;

/// Where a shooter takes shots from and how well they hit there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneProfile {
    share: [f64; 7],
    pct: [f64; 7],
}

impl ZoneProfile {
    pub fn from_summary(summary: &ZoneSummary) -> Self {
        let mut share = [0.0; 7];
        let mut pct = [0.0; 7];
        for (i, zone) in Zone::ALL.into_iter().enumerate() {
            share[i] = summary.attempt_share(zone);
            pct[i] = summary.line(zone).fg_pct().unwrap_or(0.0) / 100.0;
        }
        Self { share, pct }
    }

    pub fn from_shots(shots: &[Shot]) -> Self {
        Self::from_summary(&ZoneSummary::from_shots(shots))
    }

    /// Euclidean distance over zone shares, plus accuracy gaps weighted by how
    /// much both shooters use the zone.
    pub fn distance(&self, other: &ZoneProfile) -> f64 {
        let mut sum = 0.0;
        for i in 0..Zone::ALL.len() {
            let ds = self.share[i] - other.share[i];
            let dp = self.pct[i] - other.pct[i];
            let usage = (self.share[i] + other.share[i]) / 2.0;
            sum += ds * ds + PCT_WEIGHT * usage * dp * dp;
        }
        sum.sqrt()
    }

    pub fn similarity(&self, other: &ZoneProfile) -> f64 {
        1.0 / (1.0 + self.distance(other))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPlayer {
    pub name: String,
    pub id: String,
    pub score: f64,
}

/// Candidates ordered by similarity to the user's shots, best first.
pub fn rank_similar(user_shots: &[Shot], candidates: &[Arc<Player>]) -> Vec<SimilarPlayer> {
    if user_shots.is_empty() {
        return Vec::new();
    }
    let user = ZoneProfile::from_shots(user_shots);
    let mut ranked: Vec<SimilarPlayer> = candidates
        .par_iter()
        .filter(|p| !p.shots.is_empty())
        .map(|p| SimilarPlayer {
            name: p.name.clone(),
            id: p.id.clone(),
            score: user.similarity(&ZoneProfile::from_shots(&p.shots)),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Loads every roster player that has a resource and ranks them. Players
/// whose resources fail to load are skipped and reported.
pub fn rank_roster(
    user_shots: &[Shot],
    roster: &Roster,
    store: &PlayerRecordStore,
) -> (Vec<SimilarPlayer>, Vec<String>) {
    if user_shots.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let entries: Vec<(&str, &str)> = roster.iter().collect();
    let loaded: Vec<Result<Arc<Player>, String>> = entries
        .par_iter()
        .map(|(name, id)| {
            store
                .load(id)
                .map_err(|err| format!("{name}: {err}"))
        })
        .collect();

    let mut players = Vec::with_capacity(loaded.len());
    let mut skipped = Vec::new();
    for item in loaded {
        match item {
            Ok(player) => players.push(player),
            Err(msg) => skipped.push(msg),
        }
    }
    debug!(
        candidates = players.len(),
        skipped = skipped.len(),
        "ranking roster similarity"
    );
    (rank_similar(user_shots, &players), skipped)
}
