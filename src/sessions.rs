use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shot::Shot;

const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Accuracy,
    Form,
}

impl SessionKind {
    fn prefix(self) -> &'static str {
        match self {
            SessionKind::Accuracy => "accuracy_",
            SessionKind::Form => "form_",
        }
    }
}

/// One accuracy drill: where the user shot from and whether it went in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracySession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
    pub shots: Vec<Shot>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormSession {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// The user's recorded sessions, one directory per day:
/// `<root>/<YYYY-MM-DD>/accuracy_<n>.json` and `form_<n>.json`.
#[derive(Debug, Clone)]
pub struct SessionLibrary {
    root: PathBuf,
}

impl SessionLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date.format(DAY_FORMAT).to_string())
    }

    /// Session files of `kind` for the day, ordered by index. A missing day is empty.
    pub fn files(&self, date: NaiveDate, kind: SessionKind) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.day_dir(date)) else {
            return Vec::new();
        };
        let mut files: Vec<(u32, PathBuf)> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                session_index(name, kind).map(|idx| (idx, path))
            })
            .collect();
        files.sort();
        files.into_iter().map(|(_, path)| path).collect()
    }

    pub fn has(&self, date: NaiveDate, kind: SessionKind) -> bool {
        !self.files(date, kind).is_empty()
    }

    pub fn has_any(&self) -> bool {
        !self.recorded_dates().is_empty()
    }

    /// Days holding at least one session file, ascending.
    pub fn recorded_dates(&self) -> Vec<NaiveDate> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut dates: Vec<NaiveDate> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let name = e.file_name();
                NaiveDate::parse_from_str(name.to_str()?, DAY_FORMAT).ok()
            })
            .filter(|date| {
                self.has(*date, SessionKind::Accuracy) || self.has(*date, SessionKind::Form)
            })
            .collect();
        dates.sort();
        dates
    }

    /// Every accuracy shot recorded on the day, file by file.
    pub fn load_accuracy_shots(&self, date: NaiveDate) -> Result<Vec<Shot>> {
        let mut shots = Vec::new();
        for path in self.files(date, SessionKind::Accuracy) {
            let session: AccuracySession = read_json(&path)?;
            shots.extend(session.shots);
        }
        Ok(shots)
    }

    /// Every accuracy shot across all recorded days.
    pub fn load_all_accuracy_shots(&self) -> Result<Vec<Shot>> {
        let mut shots = Vec::new();
        for date in self.recorded_dates() {
            shots.extend(self.load_accuracy_shots(date)?);
        }
        Ok(shots)
    }

    pub fn load_form_sessions(&self, date: NaiveDate) -> Result<Vec<FormSession>> {
        self.files(date, SessionKind::Form)
            .iter()
            .map(|path| read_json(path))
            .collect()
    }

    pub fn write_accuracy_session(
        &self,
        date: NaiveDate,
        session: &AccuracySession,
    ) -> Result<PathBuf> {
        self.write_next(date, SessionKind::Accuracy, session)
    }

    pub fn write_form_session(&self, date: NaiveDate, session: &FormSession) -> Result<PathBuf> {
        self.write_next(date, SessionKind::Form, session)
    }

    fn write_next<T: Serialize>(
        &self,
        date: NaiveDate,
        kind: SessionKind,
        value: &T,
    ) -> Result<PathBuf> {
        let dir = self.day_dir(date);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let next = self
            .files(date, kind)
            .iter()
            .filter_map(|p| session_index(p.file_name()?.to_str()?, kind))
            .max()
            .map_or(1, |n| n + 1);
        let path = dir.join(format!("{}{next}.json", kind.prefix()));
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(value).context("serialize session")?;
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
        Ok(path)
    }
}

fn session_index(file_name: &str, kind: SessionKind) -> Option<u32> {
    file_name
        .strip_prefix(kind.prefix())?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn empty_root_has_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let lib = SessionLibrary::new(dir.path().join("missing"));
        assert!(lib.recorded_dates().is_empty());
        assert!(!lib.has(day(1), SessionKind::Accuracy));
        assert!(lib.load_accuracy_shots(day(1)).unwrap().is_empty());
    }

    #[test]
    fn writes_numbered_sessions_and_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let lib = SessionLibrary::new(dir.path());
        let first = AccuracySession {
            recorded_at: None,
            shots: vec![Shot::new(true, 0.0, 10.0)],
        };
        let second = AccuracySession {
            recorded_at: Some("2025-07-31T18:00:00".to_string()),
            shots: vec![Shot::new(false, 100.0, 100.0), Shot::new(true, -230.0, 5.0)],
        };
        let p1 = lib.write_accuracy_session(day(31), &first).unwrap();
        let p2 = lib.write_accuracy_session(day(31), &second).unwrap();
        assert!(p1.ends_with("2025-07-31/accuracy_1.json"));
        assert!(p2.ends_with("2025-07-31/accuracy_2.json"));

        let shots = lib.load_accuracy_shots(day(31)).unwrap();
        assert_eq!(shots.len(), 3);
        assert!(shots[0].made);
        assert!(lib.has(day(31), SessionKind::Accuracy));
        assert!(!lib.has(day(31), SessionKind::Form));
    }

    #[test]
    fn recorded_dates_skip_empty_and_foreign_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let lib = SessionLibrary::new(dir.path());
        lib.write_form_session(day(3), &FormSession::default()).unwrap();
        lib.write_accuracy_session(
            day(1),
            &AccuracySession {
                recorded_at: None,
                shots: Vec::new(),
            },
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("2025-07-02")).unwrap();
        fs::create_dir_all(dir.path().join("videos")).unwrap();
        fs::write(dir.path().join("2025-07-02").join("clip.mov"), "").unwrap();
        assert_eq!(lib.recorded_dates(), vec![day(1), day(3)]);
        assert_eq!(lib.load_form_sessions(day(3)).unwrap().len(), 1);
    }

    #[test]
    fn index_parsing() {
        assert_eq!(session_index("accuracy_12.json", SessionKind::Accuracy), Some(12));
        assert_eq!(session_index("form_1.json", SessionKind::Accuracy), None);
        assert_eq!(session_index("form_x.json", SessionKind::Form), None);
    }
}
