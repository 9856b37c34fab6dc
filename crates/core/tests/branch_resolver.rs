use opbind_core::diagnostics::{CollectingSink, Diagnostic};
use opbind_core::model::{BranchKind, Instruction, Operand, ResolvedBranch};
use opbind_core::services::{format_branch_preview, BranchTargetResolver, ResolveError};

/// No candidates leaves the branch unresolved, silently.
#[test]
fn empty_candidates_are_unresolved() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    assert_eq!(resolver.resolve(&Operand::constant(0x1000), &[]), ResolvedBranch::Unresolved);
    assert!(sink.is_empty());
}

/// One candidate is the target whatever the operand looks like.
#[test]
fn single_candidate_wins_regardless_of_operand() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    for operand in [
        Operand::constant(0x2000),
        Operand::register("rax"),
        Operand::memory("qword ptr [rip + 0x2f0e]"),
    ] {
        assert_eq!(
            resolver.resolve(&operand, &[0x1000]),
            ResolvedBranch::SingleTarget { target: 0x1000 }
        );
    }
}

/// An immediate found among the candidates beats the rendered text.
#[test]
fn immediate_in_candidates_is_authoritative() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    // Text deliberately disagrees with the immediate.
    let operand = Operand::constant(0x2000).with_text("0x1000");
    assert_eq!(
        resolver.resolve(&operand, &[0x1000, 0x2000]),
        ResolvedBranch::SingleTarget { target: 0x2000 }
    );
}

/// `0x`-prefixed operand text picks the matching candidate.
#[test]
fn rendered_text_reconciles_prefixed_hex() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    let operand = Operand::memory("0x1000");
    assert_eq!(
        resolver.resolve(&operand, &[0x2000, 0x1000]),
        ResolvedBranch::SingleTarget { target: 0x1000 }
    );
}

/// Bare and prefixed hex, any case, surrounding spaces: all match.
#[test]
fn rendered_text_reconciles_both_hex_forms() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    for text in ["1000", "0x1000", "0X1000", " 0x1000 "] {
        let operand = Operand::register("rax").with_text(text);
        assert_eq!(
            resolver.resolve(&operand, &[0x1000, 0x2000]),
            ResolvedBranch::SingleTarget { target: 0x1000 },
            "text {text:?}"
        );
    }
    let upper = Operand::memory("0xDEADBEEF");
    assert_eq!(
        resolver.resolve(&upper, &[0x1000, 0xdead_beef]),
        ResolvedBranch::SingleTarget { target: 0xdead_beef }
    );
}

/// An immediate that is not a candidate falls through to the text match.
#[test]
fn immediate_outside_candidates_falls_through_to_text() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    let operand = Operand::constant(0x9999).with_text("0x2000");
    assert_eq!(
        resolver.resolve(&operand, &[0x1000, 0x2000]),
        ResolvedBranch::SingleTarget { target: 0x2000 }
    );
}

/// More candidates than the limit gives a truncated preview plus a diagnostic.
#[test]
fn ambiguity_yields_truncated_preview_and_diagnostic() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    let candidates = [0x1000, 0x2000, 0x3000, 0x4000, 0x5000];
    let operand = Operand::register("rax");

    assert_eq!(
        resolver.resolve(&operand, &candidates),
        ResolvedBranch::MultipleTargets { preview: vec![0x1000, 0x2000, 0x3000], truncated: true }
    );
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::AmbiguousBranchTarget { operand: "rax".into(), candidates: 5 }]
    );
}

/// Fewer candidates than the limit are all previewed.
#[test]
fn ambiguity_within_limit_is_not_truncated() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    assert_eq!(
        resolver.resolve(&Operand::register("rax"), &[0x3000, 0x1000]),
        ResolvedBranch::MultipleTargets { preview: vec![0x3000, 0x1000], truncated: false }
    );
}

/// Exactly `preview_limit` candidates fit in the preview untruncated.
#[test]
fn ambiguity_at_limit_is_not_truncated() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    assert_eq!(
        resolver.resolve(&Operand::register("rax"), &[0x1000, 0x2000, 0x3000]),
        ResolvedBranch::MultipleTargets {
            preview: vec![0x1000, 0x2000, 0x3000],
            truncated: false,
        }
    );
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::AmbiguousBranchTarget { operand: "rax".into(), candidates: 3 }]
    );
}

/// Repeated candidates count once, so two copies of one address is a single target.
#[test]
fn duplicate_candidates_collapse_before_counting() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    assert_eq!(
        resolver.resolve(&Operand::register("rax"), &[0x1000, 0x1000]),
        ResolvedBranch::SingleTarget { target: 0x1000 }
    );
}

/// `resolve_for` on a non-branch instruction is an error.
#[test]
fn resolve_for_rejects_non_branch_instructions() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    let insn = Instruction::new(0x400000, "mov", vec![Operand::register("rax")]);
    assert_eq!(
        resolver.resolve_for(&insn, 0, &[0x1000]),
        Err(ResolveError::NotABranch(0x400000))
    );
}

/// `resolve_for` rejects an operand index past the end.
#[test]
fn resolve_for_checks_operand_index() {
    let sink = CollectingSink::new();
    let resolver = BranchTargetResolver::new(3, &sink);
    let insn = Instruction::new(0x400000, "jmp", vec![Operand::constant(0x1000)])
        .with_branch(BranchKind::Direct);

    assert_eq!(
        resolver.resolve_for(&insn, 0, &[0x1000, 0x2000]),
        Ok(ResolvedBranch::SingleTarget { target: 0x1000 })
    );
    assert_eq!(
        resolver.resolve_for(&insn, 1, &[0x1000]),
        Err(ResolveError::OperandOutOfRange { address: 0x400000, index: 1 })
    );
}

/// Preview labels list bare hex addresses with an `h` suffix.
#[test]
fn preview_formatting_uses_h_suffix() {
    assert_eq!(format_branch_preview(&[]), None);
    assert_eq!(format_branch_preview(&[0x401000, 0x402abc]).as_deref(), Some("[ 401000h, 402abch ]"));
}
