use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use ballin::availability::{Availability, SessionDirectory};
use ballin::config::AppConfig;
use ballin::projection::{self, OutOfRangePolicy, Surface};
use ballin::results::{Comparison, EMPTY_MESSAGE, LookupKey, ResultsAggregator};
use ballin::roster::{Roster, YOU};
use ballin::sessions::{AccuracySession, FormSession, SessionLibrary};
use ballin::shot::Shot;
use ballin::store::PlayerRecordStore;

fn data_dir(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("data");
    path.push(name);
    path
}

fn bundled() -> ResultsAggregator {
    ResultsAggregator::new(Arc::new(PlayerRecordStore::new(data_dir("players"))))
        .with_roster(Roster::builtin().clone())
}

fn player(name: &str) -> LookupKey {
    LookupKey::Player(name.to_string())
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn curry_comparison_projects_every_shot() {
    let agg = bundled();
    let results = agg.resolve(&player("Stephen Curry"));

    assert_eq!(results.has_accuracy, Some(true));
    assert_eq!(results.has_form, Some(true));
    let Comparison::Loaded(curry) = &results.comparison else {
        panic!("expected a loaded comparison, got {:?}", results.comparison);
    };
    assert_eq!(curry.id, "201939");
    assert_eq!(results.points.len(), 140);
    assert_eq!(agg.store().load_attempts(), 1);

    let surface = agg.surface();
    assert!(results.points.iter().all(|p| surface.contains(p.point)));
    let zones = results.zones.as_ref().expect("zone summary");
    assert_eq!(zones.attempts(), 140);
}

#[test]
fn you_never_touches_the_store() {
    let agg = bundled();
    let results = agg.resolve(&player(YOU));
    assert_eq!(results.comparison, Comparison::CurrentUser);
    assert!(results.points.is_empty());
    assert_eq!(agg.store().load_attempts(), 0);
}

#[test]
fn unknown_player_is_degraded_not_fatal() {
    let agg = bundled();
    let results = agg.resolve(&player("Bill Russell"));
    assert!(matches!(
        &results.comparison,
        Comparison::Unavailable { name, .. } if name == "Bill Russell"
    ));
    assert_eq!(results.has_accuracy, Some(true));
    assert!(results.diagnostics.iter().any(|d| d.contains("not in the roster")));
    assert!(
        results
            .sections()
            .iter()
            .any(|s| s == "No comparison chart available for Bill Russell.")
    );
}

#[test]
fn roster_entry_without_resource_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let agg = ResultsAggregator::new(Arc::new(PlayerRecordStore::new(dir.path())))
        .with_roster(Roster::from_pairs([("Ghost Player", "1")]));
    let results = agg.resolve(&player("Ghost Player"));
    assert!(matches!(results.comparison, Comparison::Unavailable { .. }));
    assert_eq!(agg.store().load_attempts(), 1);
}

#[test]
fn date_flags_follow_the_predicate() {
    let target = day(2025, 3, 2);
    let agg = bundled().with_availability(move |key: &LookupKey| match key {
        LookupKey::Date(d) if *d == target => Availability {
            accuracy: true,
            form: false,
        },
        _ => Availability::default(),
    });

    let hit = agg.resolve(&LookupKey::Date(target));
    assert_eq!(hit.has_accuracy, Some(true));
    assert_eq!(hit.has_form, Some(false));
    assert!(hit.shows_accuracy() && !hit.shows_form());
    assert_eq!(hit.comparison, Comparison::NotRequested);

    let miss = agg.resolve(&LookupKey::Date(day(2025, 3, 3)));
    assert!(miss.is_empty());
    assert_eq!(miss.sections(), vec![EMPTY_MESSAGE.to_string()]);
    assert_eq!(agg.store().load_attempts(), 0);
}

#[test]
fn bundled_sessions_drive_flags_and_similarity() {
    let sessions = SessionLibrary::new(data_dir("sessions"));
    let agg = bundled()
        .with_sessions(sessions.clone())
        .with_availability(SessionDirectory::new(sessions));

    let results = agg.resolve(&LookupKey::parse("2025-03-05"));
    assert_eq!(results.has_accuracy, Some(true));
    assert_eq!(results.has_form, Some(false));
    assert_eq!(results.user_shots.len(), 50);
    assert_eq!(results.user_points.len(), 50);

    let similar = results.most_similar.as_ref().expect("a most similar player");
    assert!(Roster::builtin().id_for(&similar.name).is_some());
    assert!(
        results
            .sections()
            .contains(&format!("You are most similar to {}.", similar.name))
    );
}

#[test]
fn you_collects_every_recorded_day() {
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionLibrary::new(dir.path());
    let shots = vec![Shot::new(true, 0.0, 10.0), Shot::new(false, 0.0, 250.0)];
    for d in [1, 4] {
        sessions
            .write_accuracy_session(
                day(2025, 6, d),
                &AccuracySession {
                    recorded_at: None,
                    shots: shots.clone(),
                },
            )
            .unwrap();
    }
    sessions
        .write_form_session(day(2025, 6, 4), &FormSession::default())
        .unwrap();

    let agg = ResultsAggregator::new(Arc::new(PlayerRecordStore::new(dir.path().join("none"))))
        .with_sessions(sessions.clone())
        .with_availability(SessionDirectory::new(sessions));
    let results = agg.resolve(&player(YOU));
    assert_eq!(results.has_accuracy, Some(true));
    assert_eq!(results.has_form, Some(true));
    assert_eq!(results.user_shots.len(), 4);
    assert_eq!(results.zones.as_ref().map(|z| z.makes()), Some(2));
    assert_eq!(agg.store().load_attempts(), 0);
}

#[test]
fn you_with_sessions_and_similarity_skips_the_store() {
    let sessions = SessionLibrary::new(data_dir("sessions"));
    let agg = bundled()
        .with_sessions(sessions.clone())
        .with_availability(SessionDirectory::new(sessions))
        .with_similarity(true);
    let results = agg.resolve(&player(YOU));
    assert_eq!(results.comparison, Comparison::CurrentUser);
    assert_eq!(results.user_shots.len(), 135);
    assert!(results.most_similar.is_none());
    assert_eq!(agg.store().load_attempts(), 0);
}

#[test]
fn default_config_you_lookup_skips_the_store() {
    let cfg = AppConfig {
        data_dir: data_dir("players"),
        sessions_dir: data_dir("sessions"),
        ..AppConfig::default()
    };
    let agg = cfg.aggregator();
    let results = agg.resolve(&player(YOU));
    assert!(!results.user_shots.is_empty());
    assert_eq!(agg.store().load_attempts(), 0);
}

#[test]
fn basket_projects_to_centre_plus_offset() {
    let surface = Surface::new(500.0, 470.0);
    let p = projection::project(&Shot::new(true, 0.0, 0.0), surface);
    assert!((p.x - 250.0).abs() < 1e-9);
    assert!((p.y - (235.0 + 187.5)).abs() < 1e-9);
}

#[test]
fn resolving_twice_is_deterministic() {
    let agg = bundled().with_surface(Surface::new(320.0, 300.0), OutOfRangePolicy::Reject);
    let a = agg.resolve(&player("LeBron James"));
    let b = agg.resolve(&player("LeBron James"));
    assert_eq!(a.points, b.points);
    assert_eq!(a.zones, b.zones);
}
