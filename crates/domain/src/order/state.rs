//! Legal transitions for sales orders.
//!
//! ```text
//! Draft ──► Documented ──► Confirmed ──► Delivered
//!   │            ▲             │
//!   └────────────┘             └──► Cancelled
//! ```
//!
//! `Draft` may confirm directly when line items already exist. `Delivered`
//! is a point of no return: disputes go through the return lifecycle.

use store::DocumentState;

/// Line items can be added or replaced in these states.
pub(crate) fn can_modify_items(state: DocumentState) -> bool {
    matches!(state, DocumentState::Draft | DocumentState::Documented)
}

/// Confirmation is legal from these states (line-item presence is checked
/// separately).
pub(crate) fn can_confirm(state: DocumentState) -> bool {
    matches!(state, DocumentState::Draft | DocumentState::Documented)
}

/// Only confirmed orders can be cancelled.
pub(crate) fn can_cancel(state: DocumentState) -> bool {
    matches!(state, DocumentState::Confirmed)
}

/// Only confirmed orders can be marked delivered.
pub(crate) fn can_deliver(state: DocumentState) -> bool {
    matches!(state, DocumentState::Confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_and_documented_are_editable() {
        assert!(can_modify_items(DocumentState::Draft));
        assert!(can_modify_items(DocumentState::Documented));
        assert!(!can_modify_items(DocumentState::Confirmed));
        assert!(!can_modify_items(DocumentState::Delivered));
        assert!(!can_modify_items(DocumentState::Cancelled));
    }

    #[test]
    fn confirm_from_draft_or_documented_only() {
        assert!(can_confirm(DocumentState::Draft));
        assert!(can_confirm(DocumentState::Documented));
        assert!(!can_confirm(DocumentState::Confirmed));
        assert!(!can_confirm(DocumentState::Delivered));
        assert!(!can_confirm(DocumentState::Cancelled));
    }

    #[test]
    fn cancel_from_confirmed_only() {
        assert!(!can_cancel(DocumentState::Draft));
        assert!(!can_cancel(DocumentState::Documented));
        assert!(can_cancel(DocumentState::Confirmed));
        assert!(!can_cancel(DocumentState::Delivered));
        assert!(!can_cancel(DocumentState::Cancelled));
    }

    #[test]
    fn deliver_from_confirmed_only() {
        assert!(!can_deliver(DocumentState::Draft));
        assert!(!can_deliver(DocumentState::Documented));
        assert!(can_deliver(DocumentState::Confirmed));
        assert!(!can_deliver(DocumentState::Delivered));
        assert!(!can_deliver(DocumentState::Cancelled));
    }

}
