use crate::results::LookupKey;
use crate::roster::YOU;
use crate::sessions::{SessionKind, SessionLibrary};

/// Which result categories exist for a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    pub accuracy: bool,
    pub form: bool,
}

impl Availability {
    pub const BOTH: Availability = Availability {
        accuracy: true,
        form: true,
    };
}

/// Decides whether accuracy and form data exist for a key.
pub trait SessionDataAvailability: Send + Sync {
    fn availability(&self, key: &LookupKey) -> Availability;
}

/// Reports both categories for every key without looking at any data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

impl SessionDataAvailability for AlwaysAvailable {
    fn availability(&self, _key: &LookupKey) -> Availability {
        Availability::BOTH
    }
}

/// Checks the user's session directory. League players only carry shot
/// charts, so they report accuracy and never form.
#[derive(Debug, Clone)]
pub struct SessionDirectory {
    library: SessionLibrary,
}

impl SessionDirectory {
    pub fn new(library: SessionLibrary) -> Self {
        Self { library }
    }
}

impl SessionDataAvailability for SessionDirectory {
    fn availability(&self, key: &LookupKey) -> Availability {
        match key {
            LookupKey::Date(date) => Availability {
                accuracy: self.library.has(*date, SessionKind::Accuracy),
                form: self.library.has(*date, SessionKind::Form),
            },
            LookupKey::Player(name) if name == YOU => {
                let dates = self.library.recorded_dates();
                Availability {
                    accuracy: dates
                        .iter()
                        .any(|d| self.library.has(*d, SessionKind::Accuracy)),
                    form: dates.iter().any(|d| self.library.has(*d, SessionKind::Form)),
                }
            }
            LookupKey::Player(_) => Availability {
                accuracy: true,
                form: false,
            },
        }
    }
}

impl<F> SessionDataAvailability for F
where
    F: Fn(&LookupKey) -> Availability + Send + Sync,
{
    fn availability(&self, key: &LookupKey) -> Availability {
        self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::{AccuracySession, FormSession};
    use chrono::NaiveDate;

    #[test]
    fn stub_reports_both_for_any_key() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(AlwaysAvailable.availability(&LookupKey::Date(date)), Availability::BOTH);
        assert_eq!(
            AlwaysAvailable.availability(&LookupKey::Player("Nobody".into())),
            Availability::BOTH
        );
    }

    #[test]
    fn directory_reflects_files_present() {
        let dir = tempfile::tempdir().unwrap();
        let lib = SessionLibrary::new(dir.path());
        let day = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let empty_day = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        lib.write_accuracy_session(
            day,
            &AccuracySession {
                recorded_at: None,
                shots: Vec::new(),
            },
        )
        .unwrap();
        let policy = SessionDirectory::new(lib.clone());
        assert_eq!(
            policy.availability(&LookupKey::Date(day)),
            Availability {
                accuracy: true,
                form: false
            }
        );
        assert_eq!(
            policy.availability(&LookupKey::Date(empty_day)),
            Availability::default()
        );
        lib.write_form_session(empty_day, &FormSession::default()).unwrap();
        assert_eq!(
            policy.availability(&LookupKey::Player(YOU.to_string())),
            Availability::BOTH
        );
    }

    #[test]
    fn closures_are_policies() {
        let never = |_: &LookupKey| Availability::default();
        assert_eq!(
            never.availability(&LookupKey::Player("Stephen Curry".into())),
            Availability::default()
        );
    }
}
