use opbind_core::model::{BindingResult, Variable};
use opbind_core::services::{equivalent, HighlightMode, OperandSelection, ResolvedOperandView};

const MODES: [HighlightMode; 2] = [HighlightMode::SameIdent, HighlightMode::SameText];

/// View bound to a stack variable `ident`.
fn bound(text: &str, ident: &str) -> ResolvedOperandView {
    ResolvedOperandView::new(
        text,
        BindingResult::Bound { variable: Variable::stack(ident, format!("var_{ident}")), byte_offset: 0 },
    )
}

/// A missing view on either side is never equivalent to anything.
#[test]
fn absent_side_is_never_equivalent() {
    let view = ResolvedOperandView::unbound("eax");
    for mode in MODES {
        assert!(!equivalent(None, Some(&view), mode));
        assert!(!equivalent(Some(&view), None, mode));
        assert!(!equivalent(None, None, mode));
    }
}

/// Every view is equivalent to itself in both modes.
#[test]
fn equivalence_is_reflexive_in_both_modes() {
    for view in [ResolvedOperandView::unbound("eax"), bound("[rbp - 8]", "s_8")] {
        for mode in MODES {
            assert!(equivalent(Some(&view), Some(&view), mode), "{view:?} under {mode:?}");
        }
    }
}

/// `SameText` ignores bindings and compares rendered text.
#[test]
fn same_text_mode_compares_text_only() {
    let a = bound("[rbp - 8]", "s_8");
    let b = bound("[rbp - 8]", "s_other");
    let c = ResolvedOperandView::unbound("[rbp - 8]");
    assert!(equivalent(Some(&a), Some(&b), HighlightMode::SameText));
    assert!(equivalent(Some(&a), Some(&c), HighlightMode::SameText));
    assert!(!equivalent(Some(&a), Some(&bound("[rbp - 16]", "s_8")), HighlightMode::SameText));
}

/// `SameIdent` matches differently rendered operands bound to one variable.
#[test]
fn same_ident_mode_compares_variables() {
    let a = bound("[rbp - 8]", "s_8");
    let b = bound("qword ptr [rsp + 0x10]", "s_8");
    let c = bound("[rbp - 8]", "s_16");
    assert!(equivalent(Some(&a), Some(&b), HighlightMode::SameIdent));
    assert!(!equivalent(Some(&a), Some(&c), HighlightMode::SameIdent));
}

/// A bound and an unbound operand never match under `SameIdent`, either way round.
#[test]
fn same_ident_mode_rejects_one_sided_binding() {
    let a = bound("eax", "r_0");
    let b = ResolvedOperandView::unbound("eax");
    assert!(!equivalent(Some(&a), Some(&b), HighlightMode::SameIdent));
    assert!(!equivalent(Some(&b), Some(&a), HighlightMode::SameIdent));
}

/// Two unbound operands fall back to a text comparison under `SameIdent`.
#[test]
fn same_ident_mode_falls_back_to_text_when_both_unbound() {
    let a = ResolvedOperandView::unbound("0x10");
    let b = ResolvedOperandView::unbound("0x10");
    let c = ResolvedOperandView::unbound("0x20");
    assert!(equivalent(Some(&a), Some(&b), HighlightMode::SameIdent));
    assert!(!equivalent(Some(&a), Some(&c), HighlightMode::SameIdent));
}

/// Toggling selects an operand; toggling an equivalent one clears it.
#[test]
fn toggle_selects_then_clears() {
    let mut selection = OperandSelection::new(HighlightMode::SameIdent);
    let view = bound("eax", "r_0");

    let change = selection.toggle(view.clone());
    assert_eq!(change.old, None);
    assert_eq!(change.new.as_ref(), Some(&view));
    assert!(selection.is_highlighted(&bound("ecx", "r_0")));

    // Clicking something equivalent deselects.
    let change = selection.toggle(bound("ax", "r_0"));
    assert_eq!(change.old.as_ref(), Some(&view));
    assert_eq!(change.new, None);
    assert!(selection.selected().is_none());
}

/// Toggling an unrelated operand moves the selection to it.
#[test]
fn toggle_to_another_operand_replaces_selection() {
    let mut selection = OperandSelection::new(HighlightMode::SameText);
    selection.toggle(ResolvedOperandView::unbound("eax"));
    let change = selection.toggle(ResolvedOperandView::unbound("ebx"));
    assert_eq!(change.old.map(|v| v.text), Some("eax".to_string()));
    assert_eq!(selection.selected().map(|v| v.text.as_str()), Some("ebx"));
}

/// Changing the mode keeps the selection but re-judges what is highlighted.
#[test]
fn switching_mode_keeps_selection_and_changes_matches() {
    let mut selection = OperandSelection::new(HighlightMode::SameIdent);
    selection.toggle(bound("[rbp - 8]", "s_8"));
    let same_text = bound("[rbp - 8]", "s_other");
    assert!(!selection.is_highlighted(&same_text));

    selection.set_mode(HighlightMode::SameText);
    assert_eq!(selection.mode(), HighlightMode::SameText);
    assert_eq!(selection.selected().map(|v| v.text.as_str()), Some("[rbp - 8]"));
    assert!(selection.is_highlighted(&same_text));
}

/// Operands matching the old or the new selection need a redraw.
#[test]
fn refresh_covers_old_and_new_selection() {
    let mut selection = OperandSelection::new(HighlightMode::SameText);
    selection.toggle(ResolvedOperandView::unbound("eax"));
    let change = selection.toggle(ResolvedOperandView::unbound("ebx"));

    assert!(selection.needs_refresh(&ResolvedOperandView::unbound("eax"), &change));
    assert!(selection.needs_refresh(&ResolvedOperandView::unbound("ebx"), &change));
    assert!(!selection.needs_refresh(&ResolvedOperandView::unbound("ecx"), &change));
}
