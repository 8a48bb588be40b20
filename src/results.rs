use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::availability::{AlwaysAvailable, SessionDataAvailability};
use crate::projection::{self, OutOfRangePolicy, ProjectedShot, Surface};
use crate::roster::{Roster, Selection};
use crate::sessions::SessionLibrary;
use crate::shot::{Player, Shot};
use crate::similarity::{self, SimilarPlayer};
use crate::store::PlayerRecordStore;
use crate::zones::ZoneSummary;

pub const EMPTY_MESSAGE: &str = "No data on this day.";
pub const FORM_MESSAGE: &str = "Form data will appear here.";

/// What the results view is asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    Date(NaiveDate),
    /// A roster display name, or the `"You"` sentinel.
    Player(String),
}

impl LookupKey {
    /// `YYYY-MM-DD` becomes a date, anything else a player name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => LookupKey::Date(date),
            Err(_) => LookupKey::Player(raw.to_string()),
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            LookupKey::Player(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Date keys compare nothing.
    NotRequested,
    /// The `"You"` sentinel: the user's own sessions, no league resource.
    CurrentUser,
    Loaded(Arc<Player>),
    Unavailable { name: String, reason: String },
}

impl Comparison {
    pub fn player(&self) -> Option<&Arc<Player>> {
        match self {
            Comparison::Loaded(p) => Some(p),
            _ => None,
        }
    }
}

/// Presentation-ready results for one lookup key. Flags are `None` until a
/// key has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    pub key: Option<LookupKey>,
    pub has_accuracy: Option<bool>,
    pub has_form: Option<bool>,
    pub comparison: Comparison,
    pub points: Vec<ProjectedShot>,
    pub user_shots: Vec<Shot>,
    pub user_points: Vec<ProjectedShot>,
    pub zones: Option<ZoneSummary>,
    pub most_similar: Option<SimilarPlayer>,
    pub diagnostics: Vec<String>,
}

impl Default for SessionResults {
    fn default() -> Self {
        Self::empty()
    }
}

impl SessionResults {
    pub fn empty() -> Self {
        Self {
            key: None,
            has_accuracy: None,
            has_form: None,
            comparison: Comparison::NotRequested,
            points: Vec::new(),
            user_shots: Vec::new(),
            user_points: Vec::new(),
            zones: None,
            most_similar: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn shows_accuracy(&self) -> bool {
        self.has_accuracy.unwrap_or(false)
    }

    pub fn shows_form(&self) -> bool {
        self.has_form.unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        !self.shows_accuracy() && !self.shows_form()
    }

    /// Text blocks in display order, mirroring the mobile results screen.
    pub fn sections(&self) -> Vec<String> {
        if self.is_empty() {
            return vec![EMPTY_MESSAGE.to_string()];
        }
        let mut out = Vec::new();
        if self.shows_accuracy() {
            let line = match &self.zones {
                Some(z) if z.attempts() > 0 => format!(
                    "Accuracy: {}/{} ({:.1}% FG, {:.1}% eFG)",
                    z.makes(),
                    z.attempts(),
                    z.fg_pct().unwrap_or(0.0),
                    z.efg_pct().unwrap_or(0.0)
                ),
                _ => "Accuracy: no shots recorded".to_string(),
            };
            out.push(line);
        }
        if self.shows_form() {
            out.push(FORM_MESSAGE.to_string());
        }
        match (&self.most_similar, &self.comparison) {
            (Some(similar), _) => out.push(format!("You are most similar to {}.", similar.name)),
            (None, Comparison::Unavailable { name, .. }) => {
                out.push(format!("No comparison chart available for {name}."))
            }
            _ => {}
        }
        out
    }
}

/// Turns lookup keys into [`SessionResults`].
pub struct ResultsAggregator {
    store: Arc<PlayerRecordStore>,
    roster: Roster,
    availability: Box<dyn SessionDataAvailability>,
    sessions: Option<SessionLibrary>,
    surface: Surface,
    policy: OutOfRangePolicy,
    rank_similar: bool,
}

impl ResultsAggregator {
    pub fn new(store: Arc<PlayerRecordStore>) -> Self {
        Self {
            store,
            roster: Roster::active().clone(),
            availability: Box::new(AlwaysAvailable),
            sessions: None,
            surface: Surface::DEFAULT,
            policy: OutOfRangePolicy::default(),
            rank_similar: true,
        }
    }

    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    pub fn with_availability(mut self, availability: impl SessionDataAvailability + 'static) -> Self {
        self.availability = Box::new(availability);
        self
    }

    pub fn with_sessions(mut self, sessions: SessionLibrary) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn with_surface(mut self, surface: Surface, policy: OutOfRangePolicy) -> Self {
        self.surface = surface;
        self.policy = policy;
        self
    }

    pub fn with_similarity(mut self, enabled: bool) -> Self {
        self.rank_similar = enabled;
        self
    }

    pub fn store(&self) -> &PlayerRecordStore {
        &self.store
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn resolve(&self, key: &LookupKey) -> SessionResults {
        let avail = self.availability.availability(key);
        let mut out = SessionResults {
            key: Some(key.clone()),
            has_accuracy: Some(avail.accuracy),
            has_form: Some(avail.form),
            ..SessionResults::empty()
        };

        match key {
            LookupKey::Date(date) => {
                if avail.accuracy {
                    if let Some(lib) = &self.sessions {
                        match lib.load_accuracy_shots(*date) {
                            Ok(shots) => out.user_shots = shots,
                            Err(err) => {
                                warn!(%date, error = %err, "accuracy sessions unreadable");
                                out.diagnostics
                                    .push(format!("[WARN] Sessions for {date}: {err:#}"));
                            }
                        }
                    }
                }
            }
            LookupKey::Player(name) => match self.roster.resolve(name) {
                Selection::You => {
                    out.comparison = Comparison::CurrentUser;
                    if let Some(lib) = &self.sessions {
                        match lib.load_all_accuracy_shots() {
                            Ok(shots) => out.user_shots = shots,
                            Err(err) => out
                                .diagnostics
                                .push(format!("[WARN] Sessions: {err:#}")),
                        }
                    }
                }
                Selection::Player { name, id } => match self.store.load(id) {
                    Ok(player) => {
                        debug!(name, id, shots = player.shots.len(), "comparison loaded");
                        out.diagnostics.push(format!(
                            "[INFO] Loaded {} shots for {name}",
                            player.shots.len()
                        ));
                        out.comparison = Comparison::Loaded(player);
                    }
                    Err(err) => {
                        warn!(name, id, error = %err, "comparison unavailable");
                        out.diagnostics.push(format!("[WARN] {name}: {err}"));
                        out.comparison = Comparison::Unavailable {
                            name: name.to_string(),
                            reason: err.to_string(),
                        };
                    }
                },
                Selection::Unknown => {
                    warn!(name = name.as_str(), "name not in roster");
                    out.diagnostics
                        .push(format!("[WARN] {name} is not in the roster"));
                    out.comparison = Comparison::Unavailable {
                        name: name.clone(),
                        reason: "not in roster".to_string(),
                    };
                }
            },
        }

        if let Some(player) = out.comparison.player() {
            out.points = projection::project_all(&player.shots, self.surface, self.policy);
        }
        out.user_points = projection::project_all(&out.user_shots, self.surface, self.policy);

        out.zones = match out.comparison.player() {
            Some(player) => Some(ZoneSummary::from_shots(&player.shots)),
            None if !out.user_shots.is_empty() => Some(ZoneSummary::from_shots(&out.user_shots)),
            None => None,
        };

        // Ranking reads every roster resource, which "You" must never touch.
        let bypass_store = out.comparison == Comparison::CurrentUser;
        if self.rank_similar && !bypass_store && !out.user_shots.is_empty() {
            let (ranked, skipped) =
                similarity::rank_roster(&out.user_shots, &self.roster, &self.store);
            if !skipped.is_empty() {
                out.diagnostics.push(format!(
                    "[INFO] {} roster players without shot data",
                    skipped.len()
                ));
            }
            out.most_similar = ranked.into_iter().next();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys() {
        assert_eq!(
            LookupKey::parse("2025-07-31"),
            LookupKey::Date(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap())
        );
        assert_eq!(
            LookupKey::parse(" Stephen Curry "),
            LookupKey::Player("Stephen Curry".to_string())
        );
        assert_eq!(LookupKey::parse("2025-07-31").to_string(), "2025-07-31");
    }

    #[test]
    fn initial_state_is_empty() {
        let results = SessionResults::empty();
        assert!(results.has_accuracy.is_none() && results.has_form.is_none());
        assert!(results.is_empty());
        assert_eq!(results.sections(), vec![EMPTY_MESSAGE.to_string()]);
    }

    #[test]
    fn stub_form_flag_uses_placeholder_text() {
        let dir = tempfile::tempdir().unwrap();
        let agg = ResultsAggregator::new(Arc::new(PlayerRecordStore::new(dir.path())));
        let date = NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();
        let sections = agg.resolve(&LookupKey::Date(date)).sections();
        assert!(sections.contains(&FORM_MESSAGE.to_string()));
        assert!(sections.iter().all(|s| !s.starts_with("Form: session")));
    }

    #[test]
    fn unknown_name_degrades_without_clearing_flags() {
        let dir = tempfile::tempdir().unwrap();
        let agg = ResultsAggregator::new(Arc::new(PlayerRecordStore::new(dir.path())));
        let results = agg.resolve(&LookupKey::Player("Nobody".to_string()));
        assert_eq!(results.has_accuracy, Some(true));
        assert_eq!(results.has_form, Some(true));
        assert!(matches!(results.comparison, Comparison::Unavailable { .. }));
        assert_eq!(agg.store().load_attempts(), 0);
        assert!(results.points.is_empty());
    }
}
