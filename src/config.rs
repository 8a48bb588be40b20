use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::availability::SessionDirectory;
use crate::projection::{OutOfRangePolicy, Surface};
use crate::results::ResultsAggregator;
use crate::roster::Roster;
use crate::sessions::SessionLibrary;
use crate::store::PlayerRecordStore;

const DEFAULT_DATA_DIR: &str = "data/players";
const DEFAULT_SESSIONS_DIR: &str = "data/sessions";
const DEFAULT_SEASON: &str = "2024-25";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityMode {
    /// Both categories always reported.
    #[default]
    Stub,
    /// Categories reported from the sessions directory.
    Sessions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub sessions_dir: PathBuf,
    pub roster_file: Option<PathBuf>,
    pub cache_players: bool,
    pub availability: AvailabilityMode,
    pub out_of_range: OutOfRangePolicy,
    pub surface: Surface,
    pub season: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sessions_dir: PathBuf::from(DEFAULT_SESSIONS_DIR),
            roster_file: None,
            cache_players: true,
            availability: AvailabilityMode::default(),
            out_of_range: OutOfRangePolicy::default(),
            surface: Surface::DEFAULT,
            season: DEFAULT_SEASON.to_string(),
        }
    }
}

/// Loads `.env.local` then `.env` into the process environment, if present.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = AppConfig::default();

        if let Some(dir) = get("BALLIN_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("BALLIN_SESSIONS_DIR") {
            cfg.sessions_dir = PathBuf::from(dir);
        }
        cfg.roster_file = get("BALLIN_ROSTER_FILE").map(PathBuf::from);
        if let Some(raw) = get("BALLIN_CACHE_PLAYERS") {
            match parse_bool(&raw) {
                Some(v) => cfg.cache_players = v,
                None => warn!(value = raw.as_str(), "BALLIN_CACHE_PLAYERS is not a boolean"),
            }
        }
        if let Some(raw) = get("BALLIN_AVAILABILITY") {
            match raw.to_ascii_lowercase().as_str() {
                "stub" | "always" => cfg.availability = AvailabilityMode::Stub,
                "sessions" | "directory" => cfg.availability = AvailabilityMode::Sessions,
                _ => warn!(value = raw.as_str(), "unknown BALLIN_AVAILABILITY"),
            }
        }
        if let Some(raw) = get("BALLIN_OUT_OF_RANGE") {
            match OutOfRangePolicy::parse(&raw) {
                Some(policy) => cfg.out_of_range = policy,
                None => warn!(value = raw.as_str(), "unknown BALLIN_OUT_OF_RANGE"),
            }
        }
        if let Some(raw) = get("BALLIN_SURFACE") {
            match Surface::parse(&raw) {
                Some(surface) => cfg.surface = surface,
                None => warn!(value = raw.as_str(), "BALLIN_SURFACE must look like 500x470"),
            }
        }
        if let Some(season) = get("BALLIN_SEASON") {
            cfg.season = season;
        }
        cfg
    }

    pub fn store(&self) -> PlayerRecordStore {
        PlayerRecordStore::with_memo(&self.data_dir, self.cache_players)
    }

    pub fn sessions(&self) -> SessionLibrary {
        SessionLibrary::new(&self.sessions_dir)
    }

    /// Installs the roster override, if configured. Call once at startup.
    pub fn install_roster(&self) -> Result<()> {
        let Some(path) = &self.roster_file else {
            return Ok(());
        };
        let roster = Roster::load_file(path)?;
        info!(entries = roster.len(), path = %path.display(), "roster override loaded");
        Roster::install(roster).context("install roster override")
    }

    pub fn aggregator(&self) -> ResultsAggregator {
        let agg = ResultsAggregator::new(Arc::new(self.store()))
            .with_sessions(self.sessions())
            .with_surface(self.surface, self.out_of_range);
        match self.availability {
            AvailabilityMode::Stub => agg,
            AvailabilityMode::Sessions => {
                agg.with_availability(SessionDirectory::new(self.sessions()))
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
