//! Edit/delete state of one review list.
//!
//! At most one comment in a list is being edited or awaiting delete
//! confirmation at a time:
//!
//! ```text
//! Idle ──begin_edit──▶ Editing ──save/cancel──▶ Idle
//! Idle ──request_delete──▶ ConfirmingDelete ──confirm/cancel──▶ Idle
//! ```
//!
//! Entering either mode replaces the other.

use crate::model::CommentRef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing {
        target: CommentRef,
        draft: String,
    },
    ConfirmingDelete {
        target: CommentRef,
    },
}

impl EditState {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }

    pub fn is_editing(&self, target: CommentRef) -> bool {
        matches!(self, EditState::Editing { target: t, .. } if *t == target)
    }

    pub fn is_confirming_delete(&self, target: CommentRef) -> bool {
        matches!(self, EditState::ConfirmingDelete { target: t } if *t == target)
    }

    pub fn target(&self) -> Option<CommentRef> {
        match self {
            EditState::Idle => None,
            EditState::Editing { target, .. } | EditState::ConfirmingDelete { target } => {
                Some(*target)
            }
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Replace the draft text. No-op unless editing.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditState::Editing { draft, .. } = self {
            *draft = text.into();
        }
    }

    /// Leave any mode without side effects (escape key, cancel button).
    pub fn cancel(&mut self) {
        *self = EditState::Idle;
    }
}
