//! Client input state: the place search box and the input panels
//!
//! Pure state machines shared by the browser bindings and anything else that
//! drives the date/place inputs. They never touch the current coordinate;
//! they only decide whether a lookup should be issued.

use serde::{Deserialize, Serialize};

use crate::validation::is_searchable_query;

/// Keys the place input reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Escape,
    Enter,
    Other,
}

impl InputKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => InputKey::Escape,
            "Enter" => InputKey::Enter,
            _ => InputKey::Other,
        }
    }
}

/// What the caller should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceInputAction {
    /// The query was discarded and the input should close
    Cleared,
    /// Issue a place lookup for this query
    Search(String),
    /// Nothing to do
    Ignored,
}

/// The partially typed place query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceInput {
    query: String,
}

impl PlaceInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn handle_key(&mut self, key: InputKey) -> PlaceInputAction {
        match key {
            InputKey::Escape => {
                self.query.clear();
                PlaceInputAction::Cleared
            }
            InputKey::Enter if is_searchable_query(&self.query) => {
                PlaceInputAction::Search(self.query.trim().to_string())
            }
            InputKey::Enter | InputKey::Other => PlaceInputAction::Ignored,
        }
    }
}

/// Open/closed state of the date picker and the place search.
///
/// At most one is open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPanels {
    date_open: bool,
    place_open: bool,
}

impl InputPanels {
    pub fn toggle_date(&mut self) {
        self.date_open = !self.date_open;
        if self.date_open {
            self.place_open = false;
        }
    }

    pub fn toggle_place(&mut self) {
        self.place_open = !self.place_open;
        if self.place_open {
            self.date_open = false;
        }
    }

    pub fn close_place(&mut self) {
        self.place_open = false;
    }

    pub fn is_date_open(&self) -> bool {
        self.date_open
    }

    pub fn is_place_open(&self) -> bool {
        self.place_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(query: &str) -> PlaceInput {
        let mut input = PlaceInput::new();
        input.set_query(query);
        input
    }

    #[test]
    fn test_enter_below_minimum_length_is_ignored() {
        let mut input = typed("Ba");
        assert_eq!(input.handle_key(InputKey::Enter), PlaceInputAction::Ignored);
        assert_eq!(input.query(), "Ba");
    }

    #[test]
    fn test_enter_at_minimum_length_searches() {
        let mut input = typed("Bat");
        assert_eq!(
            input.handle_key(InputKey::Enter),
            PlaceInputAction::Search("Bat".to_string())
        );
        // the query stays so the user can refine it
        assert_eq!(input.query(), "Bat");
    }

    #[test]
    fn test_escape_clears_partial_query() {
        let mut input = typed("Lond");
        assert_eq!(input.handle_key(InputKey::Escape), PlaceInputAction::Cleared);
        assert_eq!(input.query(), "");
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut input = typed("London");
        assert_eq!(input.handle_key(InputKey::Other), PlaceInputAction::Ignored);
        assert_eq!(input.query(), "London");
    }

    #[test]
    fn test_key_names() {
        assert_eq!(InputKey::from_key_name("Escape"), InputKey::Escape);
        assert_eq!(InputKey::from_key_name("Esc"), InputKey::Escape);
        assert_eq!(InputKey::from_key_name("Enter"), InputKey::Enter);
        assert_eq!(InputKey::from_key_name("a"), InputKey::Other);
    }

    #[test]
    fn test_panels_are_mutually_exclusive() {
        let mut panels = InputPanels::default();
        assert!(!panels.is_date_open() && !panels.is_place_open());

        panels.toggle_date();
        assert!(panels.is_date_open());

        panels.toggle_place();
        assert!(panels.is_place_open());
        assert!(!panels.is_date_open());

        panels.toggle_date();
        assert!(panels.is_date_open());
        assert!(!panels.is_place_open());

        panels.toggle_date();
        assert!(!panels.is_date_open() && !panels.is_place_open());
    }

    #[test]
    fn test_close_place_leaves_date_alone() {
        let mut panels = InputPanels::default();
        panels.toggle_place();
        panels.close_place();
        assert!(!panels.is_place_open());
        assert!(!panels.is_date_open());
    }
}
