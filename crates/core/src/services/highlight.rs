use serde::{Deserialize, Serialize};

use crate::model::BindingResult;

/// How two operands are judged to be "the same" for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightMode {
    /// Same recovered variable; falls back to text when neither side is bound.
    #[default]
    SameIdent,
    /// Same rendered text.
    SameText,
}

/// Rendered text of an operand plus whatever variable it was bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOperandView {
    pub text: String,
    pub binding: BindingResult,
}

impl ResolvedOperandView {
    /// View of an operand rendered as `text` with `binding`.
    pub fn new(text: impl Into<String>, binding: BindingResult) -> Self {
        Self { text: text.into(), binding }
    }

    /// View of an operand no variable was bound to.
    pub fn unbound(text: impl Into<String>) -> Self {
        Self::new(text, BindingResult::NoBinding)
    }
}

/// Whether `a` and `b` refer to the same thing under `mode`.
///
/// Symmetric and reflexive. Under `SameIdent` a bound operand never matches
/// an unbound one, even when their text is identical.
pub fn equivalent(
    a: Option<&ResolvedOperandView>,
    b: Option<&ResolvedOperandView>,
    mode: HighlightMode,
) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    match mode {
        HighlightMode::SameText => a.text == b.text,
        HighlightMode::SameIdent => match (a.binding.variable(), b.binding.variable()) {
            (Some(x), Some(y)) => x.ident == y.ident,
            (None, None) => a.text == b.text,
            _ => false,
        },
    }
}

/// Selection before and after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub old: Option<ResolvedOperandView>,
    pub new: Option<ResolvedOperandView>,
}

/// The "currently selected operand", owned by whoever renders the listing.
#[derive(Debug, Clone, Default)]
pub struct OperandSelection {
    mode: HighlightMode,
    selected: Option<ResolvedOperandView>,
}

impl OperandSelection {
    pub fn new(mode: HighlightMode) -> Self {
        Self { mode, selected: None }
    }

    pub fn mode(&self) -> HighlightMode {
        self.mode
    }

    /// Switch the equivalence mode; the current selection is kept.
    pub fn set_mode(&mut self, mode: HighlightMode) {
        self.mode = mode;
    }

    pub fn selected(&self) -> Option<&ResolvedOperandView> {
        self.selected.as_ref()
    }

    /// Replace the selection outright.
    pub fn select(&mut self, view: Option<ResolvedOperandView>) -> SelectionChange {
        let old = std::mem::replace(&mut self.selected, view);
        SelectionChange { old, new: self.selected.clone() }
    }

    /// Click semantics: selecting something equivalent to the current
    /// selection clears it, anything else becomes the new selection.
    pub fn toggle(&mut self, view: ResolvedOperandView) -> SelectionChange {
        if equivalent(Some(&view), self.selected.as_ref(), self.mode) {
            self.select(None)
        } else {
            self.select(Some(view))
        }
    }

    /// Whether `view` is highlighted under the current selection.
    pub fn is_highlighted(&self, view: &ResolvedOperandView) -> bool {
        equivalent(Some(view), self.selected.as_ref(), self.mode)
    }

    /// Whether `view` must be redrawn after `change`.
    pub fn needs_refresh(&self, view: &ResolvedOperandView, change: &SelectionChange) -> bool {
        equivalent(Some(view), change.old.as_ref(), self.mode)
            || equivalent(Some(view), change.new.as_ref(), self.mode)
    }
}
