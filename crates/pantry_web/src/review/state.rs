//! Review page state machine.
//!
//! ```text
//! Loading ──ok──▶ Loaded ──prepare──▶ HandoffPrepared
//!    │              ▲  │edit                │
//!    └─err─▶ LoadFailed └──┘◀──────edit──────┘
//! ```

use chrono::{DateTime, Utc};
use pantry_protocol::{
    is_known_category, parse_quantity_input, BackendError, HandoffPayload, Inventory,
    InventoryDraft, Quantity,
};

/// A loaded draft plus the volunteer's edits to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftReview {
    pub draft: InventoryDraft,
}

impl DraftReview {
    pub fn inventory(&self) -> &Inventory {
        &self.draft.inventory
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReviewState {
    #[default]
    Loading,
    Loaded(DraftReview),
    HandoffPrepared(DraftReview),
    LoadFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(Quantity),
    /// Non-numeric input or unknown category; nothing changed.
    Rejected,
    /// No draft to edit.
    NotEditable,
}

impl ReviewState {
    pub fn load_finished(&mut self, result: Result<InventoryDraft, BackendError>) {
        *self = match result {
            Ok(draft) => ReviewState::Loaded(DraftReview { draft }),
            Err(e) => ReviewState::LoadFailed(e.to_string()),
        };
    }

    pub fn review(&self) -> Option<&DraftReview> {
        match self {
            ReviewState::Loaded(review) | ReviewState::HandoffPrepared(review) => Some(review),
            ReviewState::Loading | ReviewState::LoadFailed(_) => None,
        }
    }

    pub fn is_handoff_prepared(&self) -> bool {
        matches!(self, ReviewState::HandoffPrepared(_))
    }

    /// Set one category from raw input text. Any accepted edit clears a
    /// prepared handoff.
    pub fn edit(&mut self, category: &str, raw: &str) -> EditOutcome {
        let review = match self {
            ReviewState::Loaded(review) | ReviewState::HandoffPrepared(review) => review,
            ReviewState::Loading | ReviewState::LoadFailed(_) => return EditOutcome::NotEditable,
        };
        if !is_known_category(category) {
            return EditOutcome::Rejected;
        }
        let Some(quantity) = parse_quantity_input(raw) else {
            return EditOutcome::Rejected;
        };

        review.draft.inventory.set(category, quantity);
        *self = match std::mem::take(self) {
            ReviewState::HandoffPrepared(review) => ReviewState::Loaded(review),
            other => other,
        };
        EditOutcome::Updated(quantity)
    }

    /// Apply a submitted form. Only fields whose parsed value differs from
    /// the current quantity count as edits, so resubmitting an unchanged
    /// form keeps a prepared handoff.
    pub fn apply_form<'a>(
        &mut self,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<(String, EditOutcome)> {
        let mut outcomes = Vec::new();
        for (category, raw) in fields {
            let Some(review) = self.review() else {
                outcomes.push((category.to_string(), EditOutcome::NotEditable));
                continue;
            };
            if is_known_category(category)
                && parse_quantity_input(raw) == Some(review.inventory().quantity(category))
            {
                continue;
            }
            let outcome = self.edit(category, raw);
            outcomes.push((category.to_string(), outcome));
        }
        outcomes
    }

    /// Snapshot the edited inventory for a teammate.
    ///
    /// Re-preparing overwrites: the caller stores the returned payload over
    /// any earlier one.
    pub fn prepare_handoff(&mut self, now: DateTime<Utc>) -> Option<HandoffPayload> {
        let review = match std::mem::take(self) {
            ReviewState::Loaded(review) | ReviewState::HandoffPrepared(review) => review,
            other => {
                *self = other;
                return None;
            }
        };
        let payload = HandoffPayload::new(
            review.draft.pantry_id.clone(),
            now,
            review.draft.inventory.clone(),
        );
        *self = ReviewState::HandoffPrepared(review);
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_ids::PantryId;
    use pantry_protocol::DraftFile;

    fn loaded(pairs: &[(&str, Quantity)]) -> ReviewState {
        let mut state = ReviewState::default();
        state.load_finished(Ok(InventoryDraft {
            pantry_id: PantryId::parse("p123").unwrap(),
            inventory: pairs.iter().map(|(c, q)| (c.to_string(), *q)).collect(),
            files: vec![DraftFile {
                filename: Some("shelf.jpg".to_string()),
                size_bytes: 10,
            }],
        }));
        state
    }

    fn quantity(state: &ReviewState, category: &str) -> Quantity {
        state.review().unwrap().inventory().quantity(category)
    }

    #[test]
    fn test_failed_load_has_nothing_editable() {
        let mut state = ReviewState::default();
        state.load_finished(Err(BackendError::Transport("connection refused".into())));
        assert_eq!(state, ReviewState::LoadFailed("connection refused".into()));
        assert!(state.review().is_none());
        assert_eq!(state.edit("Beverages", "4"), EditOutcome::NotEditable);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        let mut state = loaded(&[("Beverages", 3)]);
        assert_eq!(state.edit("Beverages", "-5"), EditOutcome::Updated(0));
        assert_eq!(quantity(&state, "Beverages"), 0);
    }

    #[test]
    fn test_non_numeric_leaves_value() {
        let mut state = loaded(&[("Beverages", 3)]);
        assert_eq!(state.edit("Beverages", "lots"), EditOutcome::Rejected);
        assert_eq!(quantity(&state, "Beverages"), 3);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut state = loaded(&[]);
        assert_eq!(state.edit("Widgets", "2"), EditOutcome::Rejected);
        assert!(state.review().unwrap().inventory().is_empty());
    }

    #[test]
    fn test_edit_after_prepare_returns_to_loaded() {
        let mut state = loaded(&[("Cereal", 1)]);
        assert!(state.prepare_handoff(Utc::now()).is_some());
        assert!(state.is_handoff_prepared());

        state.edit("Cereal", "2");
        assert!(matches!(state, ReviewState::Loaded(_)));
        assert_eq!(quantity(&state, "Cereal"), 2);
    }

    #[test]
    fn test_rejected_edit_keeps_handoff() {
        let mut state = loaded(&[("Cereal", 1)]);
        state.prepare_handoff(Utc::now());
        assert_eq!(state.edit("Cereal", "abc"), EditOutcome::Rejected);
        assert!(state.is_handoff_prepared());
    }

    #[test]
    fn test_unchanged_form_keeps_handoff() {
        let mut state = loaded(&[("Beverages", 3)]);
        state.prepare_handoff(Utc::now());

        let outcomes = state.apply_form([("Beverages", "3"), ("Cereal", "0")]);
        assert!(outcomes.is_empty());
        assert!(state.is_handoff_prepared());

        let outcomes = state.apply_form([("Beverages", "7"), ("Cereal", "")]);
        assert_eq!(outcomes, vec![("Beverages".to_string(), EditOutcome::Updated(7))]);
        assert!(!state.is_handoff_prepared());
    }

    #[test]
    fn test_prepare_twice_reflects_latest_edit() {
        let mut state = loaded(&[("Beverages", 3)]);
        let first = state.prepare_handoff(Utc::now()).unwrap();
        state.edit("Beverages", "9");
        let second = state.prepare_handoff(Utc::now()).unwrap();

        assert_eq!(first.reviewed_inventory.quantity("Beverages"), 3);
        assert_eq!(second.reviewed_inventory.quantity("Beverages"), 9);
        assert_eq!(second.pantry_id.as_str(), "p123");
    }

    #[test]
    fn test_prepare_without_draft() {
        let mut state = ReviewState::Loading;
        assert!(state.prepare_handoff(Utc::now()).is_none());
        assert_eq!(state, ReviewState::Loading);
    }
}
