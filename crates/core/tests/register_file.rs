use opbind_core::arch::{registers_alias, ArchError, CanonicalRegister, RegisterFile, RegisterMap};

/// Every x86_64 sub-register resolves to its full-width register, case-insensitively.
#[test]
fn x86_64_sub_registers_share_canonical_id() {
    let regs = RegisterMap::x86_64().unwrap();
    let rax = regs.canonical("rax").unwrap();
    for alias in ["eax", "ax", "al", "ah", "RAX"] {
        assert_eq!(regs.canonical(alias), Some(rax), "{alias}");
    }
    for (wide, narrow) in [("r8", "r8d"), ("r15", "r15b"), ("rsp", "spl"), ("rip", "eip")] {
        assert!(registers_alias(&regs, wide, narrow), "{wide} vs {narrow}");
    }
    assert!(!registers_alias(&regs, "rax", "rbx"));
    assert!(!registers_alias(&regs, "al", "bl"));
}

/// Table rows carry the register width in bytes.
#[test]
fn x86_64_widths_are_recorded() {
    let regs = RegisterMap::x86_64().unwrap();
    assert_eq!(regs.get("rax").map(|e| e.width), Some(8));
    assert_eq!(regs.get("eax").map(|e| e.width), Some(4));
    assert_eq!(regs.get("r10w").map(|e| e.width), Some(2));
    assert_eq!(regs.get("sil").map(|e| e.width), Some(1));
}

/// aarch64 `w` views, `fp`/`lr` and `wsp` alias their 64-bit registers.
#[test]
fn aarch64_aliases() {
    let regs = RegisterMap::aarch64().unwrap();
    assert!(registers_alias(&regs, "x0", "w0"));
    assert!(registers_alias(&regs, "fp", "x29"));
    assert!(registers_alias(&regs, "lr", "w30"));
    assert!(registers_alias(&regs, "sp", "wsp"));
    assert!(!registers_alias(&regs, "x1", "w2"));
}

/// A register missing from the table does not even alias itself.
#[test]
fn unknown_registers_do_not_alias_themselves() {
    let regs = RegisterMap::x86_64().unwrap();
    assert_eq!(regs.canonical("xmm0"), None);
    assert!(!registers_alias(&regs, "xmm0", "xmm0"));
}

/// Common arch spellings are accepted; anything else is `UnsupportedArch`.
#[test]
fn for_arch_accepts_aliases_and_rejects_unknown() {
    assert_eq!(RegisterMap::for_arch("amd64").unwrap().name(), "x86_64");
    assert_eq!(RegisterMap::for_arch("ARM64").unwrap().name(), "aarch64");
    assert!(matches!(RegisterMap::for_arch("mips"), Err(ArchError::UnsupportedArch(name)) if name == "mips"));
}

/// Names are compared case-insensitively when checking for duplicates.
#[test]
fn custom_tables_reject_duplicate_names() {
    let rows = vec![
        ("r0".to_string(), CanonicalRegister(0), 4),
        ("R0".to_string(), CanonicalRegister(1), 4),
    ];
    assert!(matches!(
        RegisterMap::new("toy", rows),
        Err(ArchError::DuplicateRegister { name, .. }) if name == "R0"
    ));
}
