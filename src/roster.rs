use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::{Lazy, OnceCell};

/// Display name standing for the current user rather than a roster player.
pub const YOU: &str = "You";

const BUILTIN: &[(&str, &str)] = &[
    ("Anthony Davis", "203076"),
    ("Anthony Edwards", "1630162"),
    ("De'Aaron Fox", "1628368"),
    ("Damian Lillard", "203081"),
    ("Devin Booker", "1626164"),
    ("Donovan Mitchell", "1628378"),
    ("Giannis Antetokounmpo", "203507"),
    ("Ja Morant", "1629630"),
    ("Jalen Brunson", "1628973"),
    ("James Harden", "201935"),
    ("Jayson Tatum", "1628369"),
    ("Jimmy Butler", "202710"),
    ("Joel Embiid", "203954"),
    ("Kawhi Leonard", "202695"),
    ("Kevin Durant", "201142"),
    ("Klay Thompson", "202691"),
    ("Kyrie Irving", "202681"),
    ("LeBron James", "2544"),
    ("Luka Doncic", "1629029"),
    ("Nikola Jokic", "203999"),
    ("Paul George", "202331"),
    ("Shai Gilgeous-Alexander", "1628983"),
    ("Stephen Curry", "201939"),
    ("Trae Young", "1629027"),
    ("Tyrese Haliburton", "1630169"),
    ("Victor Wembanyama", "1641705"),
];

static BUILTIN_ROSTER: Lazy<Roster> = Lazy::new(|| Roster {
    entries: BUILTIN
        .iter()
        .map(|(name, id)| (name.to_string(), id.to_string()))
        .collect(),
});

static ACTIVE: OnceCell<Roster> = OnceCell::new();

/// Result of resolving a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    You,
    Player { name: &'a str, id: &'a str },
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: BTreeMap<String, String>,
}

impl Roster {
    pub fn builtin() -> &'static Roster {
        &BUILTIN_ROSTER
    }

    /// The process-wide roster: the override installed at startup, if any.
    pub fn active() -> &'static Roster {
        ACTIVE.get().unwrap_or_else(Roster::builtin)
    }

    /// Installs the process-wide roster. Only the first call takes effect.
    pub fn install(roster: Roster) -> Result<()> {
        ACTIVE
            .set(roster)
            .map_err(|_| anyhow!("roster already installed"))
    }

    pub fn from_pairs<I, N, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(n, d)| (n.into(), d.into()))
                .collect(),
        }
    }

    /// Reads a `{ "Display Name": "id" }` override file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read roster {}", path.display()))?;
        let entries = serde_json::from_str::<BTreeMap<String, String>>(&raw)
            .with_context(|| format!("parse roster {}", path.display()))?;
        if entries.keys().any(|name| name == YOU) {
            return Err(anyhow!("roster may not redefine the \"{YOU}\" sentinel"));
        }
        Ok(Self { entries })
    }

    pub fn id_for(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn name_for(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| v.as_str() == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn resolve<'a>(&'a self, name: &'a str) -> Selection<'a> {
        if name == YOU {
            return Selection::You;
        }
        match self.entries.get_key_value(name) {
            Some((name, id)) => Selection::Player { name, id },
            None => Selection::Unknown,
        }
    }

    /// Entries in display-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_resolves_curry() {
        let roster = Roster::builtin();
        assert_eq!(roster.len(), 26);
        assert_eq!(roster.id_for("Stephen Curry"), Some("201939"));
        assert_eq!(roster.name_for("2544"), Some("LeBron James"));
        assert_eq!(
            roster.resolve("Stephen Curry"),
            Selection::Player {
                name: "Stephen Curry",
                id: "201939"
            }
        );
    }

    #[test]
    fn you_is_a_sentinel_not_a_roster_entry() {
        let roster = Roster::builtin();
        assert_eq!(roster.resolve(YOU), Selection::You);
        assert!(roster.id_for(YOU).is_none());
        assert_eq!(roster.resolve("Nobody"), Selection::Unknown);
    }

    #[test]
    fn ids_are_unique() {
        let roster = Roster::builtin();
        let mut ids: Vec<&str> = roster.iter().map(|(_, id)| id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), roster.len());
    }

    #[test]
    fn override_file_rejects_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, r#"{"You":"1"}"#).unwrap();
        assert!(Roster::load_file(&path).is_err());
        fs::write(&path, r#"{"Test Guard":"42"}"#).unwrap();
        let roster = Roster::load_file(&path).unwrap();
        assert_eq!(roster.id_for("Test Guard"), Some("42"));
    }
}
