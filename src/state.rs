use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::results::{LookupKey, SessionResults};
use crate::roster::{Roster, YOU};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Calendar,
    Database,
    Results,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    /// Screen to return to from results.
    pub origin: Screen,
    pub dates: Vec<NaiveDate>,
    pub players: Vec<String>,
    pub date_selected: usize,
    pub player_selected: usize,
    pub results: SessionResults,
    pub show_user_overlay: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    /// `dates` are session days; the player list is `"You"` then the roster in name order.
    pub fn new(dates: Vec<NaiveDate>, roster: &Roster) -> Self {
        let mut players = vec![YOU.to_string()];
        players.extend(roster.iter().map(|(name, _)| name.to_string()));
        let date_selected = dates.len().saturating_sub(1);
        Self {
            screen: Screen::Calendar,
            origin: Screen::Calendar,
            dates,
            players,
            date_selected,
            player_selected: 0,
            results: SessionResults::empty(),
            show_user_overlay: true,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn toggle_list(&mut self) {
        self.screen = match self.screen {
            Screen::Calendar => Screen::Database,
            Screen::Database => Screen::Calendar,
            Screen::Results => self.origin,
        };
    }

    pub fn back(&mut self) {
        if self.screen == Screen::Results {
            self.screen = self.origin;
        }
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Calendar => {
                if self.date_selected + 1 < self.dates.len() {
                    self.date_selected += 1;
                }
            }
            Screen::Database => {
                if self.player_selected + 1 < self.players.len() {
                    self.player_selected += 1;
                }
            }
            Screen::Results => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Calendar => self.date_selected = self.date_selected.saturating_sub(1),
            Screen::Database => self.player_selected = self.player_selected.saturating_sub(1),
            Screen::Results => {}
        }
    }

    /// Key for the highlighted row of the current list.
    pub fn selected_key(&self) -> Option<LookupKey> {
        match self.screen {
            Screen::Calendar => self.dates.get(self.date_selected).copied().map(LookupKey::Date),
            Screen::Database => self
                .players
                .get(self.player_selected)
                .cloned()
                .map(LookupKey::Player),
            Screen::Results => self.results.key.clone(),
        }
    }

    /// Shows freshly resolved results and moves their diagnostics into the log.
    pub fn show_results(&mut self, mut results: SessionResults) {
        if self.screen != Screen::Results {
            self.origin = self.screen;
        }
        for msg in results.diagnostics.drain(..) {
            self.push_log(msg);
        }
        if let Some(key) = &results.key {
            self.push_log(format!("[INFO] Showing results for {key}"));
        }
        self.results = results;
        self.screen = Screen::Results;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut state = AppState::new(Vec::new(), Roster::builtin());
        for i in 0..(MAX_LOGS + 5) {
            state.push_log(format!("{i}"));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert_eq!(state.logs.front().map(String::as_str), Some("5"));
    }
}
