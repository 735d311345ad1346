//! Trigger-to-action mapping.
//!
//! Front ends translate their native input into a canonical key name
//! (`tab`, `space`, `q`, `ctrl+c`, ...) and ask a [`Keymap`] which
//! [`Action`] it triggers. Nothing here knows about terminals.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{CountingSession, DealOutcome};

/// A discrete user trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Deal the next card.
    Deal,
    /// Reveal the running count.
    Reveal,
    /// Start over with a new deck.
    Reset,
    /// Leave the front end.
    Quit,
}

impl Action {
    /// Every action, in the order they are listed to the user.
    pub const ALL: [Action; 4] = [Action::Deal, Action::Reveal, Action::Reset, Action::Quit];

    /// Short description for help panels.
    pub const fn describe(self) -> &'static str {
        match self {
            Action::Deal => "Next card",
            Action::Reveal => "Reveal count",
            Action::Reset => "Reset deck",
            Action::Quit => "Quit",
        }
    }

    /// Apply the action to a session.
    ///
    /// Deal is refused while the session reports it disabled. Quit leaves
    /// the session untouched; leaving is up to the caller.
    pub fn apply(self, session: &mut CountingSession) -> Applied {
        match self {
            Action::Deal if !session.view().deal_enabled => Applied::DealDisabled,
            Action::Deal => Applied::Dealt(session.deal_next()),
            Action::Reveal => {
                session.reveal_count();
                Applied::Revealed(session.running_count())
            }
            Action::Reset => {
                session.reset();
                Applied::Reset
            }
            Action::Quit => Applied::Quit,
        }
    }
}

/// What [`Action::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A deal was attempted.
    Dealt(DealOutcome),
    /// Deal was triggered while disabled; nothing changed.
    DealDisabled,
    /// The count is now shown.
    Revealed(i32),
    /// A fresh deck was shuffled.
    Reset,
    /// The front end should exit.
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Invalid key binding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The key name could not be understood.
    #[error("unrecognised key name '{0}'")]
    UnknownKey(String),
    /// One key was assigned to two actions.
    #[error("key '{key}' is bound to both {first:?} and {second:?}")]
    Conflict {
        /// Canonical key name.
        key: String,
        /// Action that claimed the key first.
        first: Action,
        /// Action that tried to claim it again.
        second: Action,
    },
    /// An action was left without any key.
    #[error("no key bound for {0:?}")]
    Unbound(Action),
}

/// Configured key names per action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Keys that deal a card.
    pub deal: Vec<String>,
    /// Keys that reveal the count.
    pub reveal: Vec<String>,
    /// Keys that reset the session.
    pub reset: Vec<String>,
    /// Keys that quit.
    pub quit: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            deal: vec!["tab".to_string()],
            reveal: vec!["space".to_string()],
            reset: vec!["r".to_string()],
            quit: vec!["q".to_string(), "esc".to_string(), "ctrl+c".to_string()],
        }
    }
}

impl KeyBindings {
    /// Keys configured for one action.
    pub fn keys(&self, action: Action) -> &[String] {
        match action {
            Action::Deal => &self.deal,
            Action::Reveal => &self.reveal,
            Action::Reset => &self.reset,
            Action::Quit => &self.quit,
        }
    }

    /// Validate and index the bindings for lookup.
    pub fn keymap(&self) -> Result<Keymap, BindingError> {
        let mut map = HashMap::new();
        for action in Action::ALL {
            let keys = self.keys(action);
            if keys.is_empty() {
                return Err(BindingError::Unbound(action));
            }
            for raw in keys {
                let key = canonical_key(raw)?;
                if let Some(first) = map.insert(key.clone(), action) {
                    if first != action {
                        return Err(BindingError::Conflict {
                            key,
                            first,
                            second: action,
                        });
                    }
                }
            }
        }
        Ok(Keymap {
            map,
            bindings: self.clone(),
        })
    }
}

/// Validated lookup table from canonical key name to action.
#[derive(Debug, Clone)]
pub struct Keymap {
    map: HashMap<String, Action>,
    bindings: KeyBindings,
}

impl Keymap {
    /// Action bound to a canonical key name.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.map.get(key).copied()
    }

    /// Human label for an action's keys, e.g. `TAB` or `Q / ESC / CTRL+C`.
    pub fn label(&self, action: Action) -> String {
        self.bindings
            .keys(action)
            .iter()
            .map(|key| key.trim().to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Normalise a configured key name.
///
/// Named keys and `ctrl+<char>` are lower-cased; bare characters keep their
/// case so `R` and `r` can be bound separately.
pub fn canonical_key(raw: &str) -> Result<String, BindingError> {
    if raw == " " {
        return Ok("space".to_string());
    }
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if matches!(
        lower.as_str(),
        "tab" | "space" | "enter" | "esc" | "backspace" | "up" | "down" | "left" | "right"
    ) {
        return Ok(lower);
    }
    if let Some(rest) = lower.strip_prefix("ctrl+") {
        let mut chars = rest.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch.is_ascii_graphic() {
                return Ok(format!("ctrl+{ch}"));
            }
        }
        return Err(BindingError::UnknownKey(raw.to_string()));
    }
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_graphic() => Ok(ch.to_string()),
        _ => Err(BindingError::UnknownKey(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        deck::{DeckFactory, DECK_SIZE},
        session::ExhaustionPolicy,
    };

    #[test]
    fn default_bindings_resolve() {
        let keymap = KeyBindings::default().keymap().expect("defaults are valid");
        assert_eq!(keymap.action_for("tab"), Some(Action::Deal));
        assert_eq!(keymap.action_for("space"), Some(Action::Reveal));
        assert_eq!(keymap.action_for("r"), Some(Action::Reset));
        assert_eq!(keymap.action_for("ctrl+c"), Some(Action::Quit));
        assert_eq!(keymap.action_for("x"), None);
        assert_eq!(keymap.label(Action::Quit), "Q / ESC / CTRL+C");
    }

    #[test]
    fn canonicalises_names() {
        assert_eq!(canonical_key(" TAB "), Ok("tab".to_string()));
        assert_eq!(canonical_key(" "), Ok("space".to_string()));
        assert_eq!(canonical_key("Ctrl+C"), Ok("ctrl+c".to_string()));
        assert_eq!(canonical_key("Q"), Ok("Q".to_string()));
        assert!(canonical_key("ctrl+").is_err());
        assert!(canonical_key("hyper").is_err());
    }

    #[test]
    fn rejects_conflicts_and_gaps() {
        let mut bindings = KeyBindings::default();
        bindings.reset = vec!["q".to_string()];
        assert!(matches!(
            bindings.keymap(),
            Err(BindingError::Conflict { first: Action::Reset, second: Action::Quit, .. })
        ));

        let mut bindings = KeyBindings::default();
        bindings.reveal.clear();
        assert_eq!(bindings.keymap().err(), Some(BindingError::Unbound(Action::Reveal)));
    }

    #[test]
    fn q_can_be_rebound_to_reset() {
        let bindings = KeyBindings {
            reset: vec!["q".to_string()],
            quit: vec!["esc".to_string()],
            ..KeyBindings::default()
        };
        let keymap = bindings.keymap().expect("q as reset is valid");
        assert_eq!(keymap.action_for("q"), Some(Action::Reset));
    }

    #[test]
    fn actions_drive_session() {
        let mut session = CountingSession::new(DeckFactory::seeded(1), ExhaustionPolicy::Finish);
        assert!(matches!(
            Action::Deal.apply(&mut session),
            Applied::Dealt(DealOutcome::Dealt(_))
        ));
        assert_eq!(session.remaining(), DECK_SIZE - 1);
        let count = session.running_count();
        assert_eq!(Action::Reveal.apply(&mut session), Applied::Revealed(count));
        assert!(session.is_revealed());
        assert_eq!(Action::Reset.apply(&mut session), Applied::Reset);
        assert_eq!(session.remaining(), DECK_SIZE);
        assert_eq!(Action::Quit.apply(&mut session), Applied::Quit);
        assert_eq!(session.remaining(), DECK_SIZE);
    }

    #[test]
    fn deal_is_refused_once_finished() {
        let mut session = CountingSession::new(DeckFactory::seeded(2), ExhaustionPolicy::Finish);
        for _ in 0..DECK_SIZE {
            Action::Deal.apply(&mut session);
        }
        assert_eq!(
            Action::Deal.apply(&mut session),
            Applied::Dealt(DealOutcome::Finished)
        );
        assert_eq!(Action::Deal.apply(&mut session), Applied::DealDisabled);
        assert_eq!(Action::Reset.apply(&mut session), Applied::Reset);
        assert!(matches!(
            Action::Deal.apply(&mut session),
            Applied::Dealt(DealOutcome::Dealt(_))
        ));
    }
}
