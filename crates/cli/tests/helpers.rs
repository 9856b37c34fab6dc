use opbind::{load_config, parse_address, parse_highlight_mode, parse_operand_ref, sha256_file};
use opbind_core::services::HighlightMode;
use tempfile::tempdir;

/// Addresses parse from `0x` hex or decimal; junk is rejected.
#[test]
fn parse_address_accepts_hex_and_decimal() {
    assert_eq!(parse_address("0x401000").unwrap(), 0x401000);
    assert_eq!(parse_address("0X10").unwrap(), 16);
    assert_eq!(parse_address("4096").unwrap(), 4096);
    assert!(parse_address("0xzz").is_err());
    assert!(parse_address("").is_err());
}

/// `ADDR:INDEX` splits into an address and an operand index.
#[test]
fn parse_operand_ref_splits_address_and_index() {
    assert_eq!(parse_operand_ref("0x1004:1").unwrap(), (0x1004, 1));
    assert_eq!(parse_operand_ref("4096:0").unwrap(), (4096, 0));
    assert!(parse_operand_ref("0x1004").is_err());
    let err = parse_operand_ref("0x1004:x").unwrap_err();
    assert!(err.to_string().contains("Invalid operand index"));
}

/// Only the two kebab-case mode names are accepted.
#[test]
fn parse_highlight_mode_knows_both_modes() {
    assert_eq!(parse_highlight_mode("same-ident").unwrap(), HighlightMode::SameIdent);
    assert_eq!(parse_highlight_mode("same-text").unwrap(), HighlightMode::SameText);
    let err = parse_highlight_mode("loose").unwrap_err();
    assert!(err.to_string().contains("Invalid highlight mode"));
}

/// No config path means the default config.
#[test]
fn load_config_defaults_without_path() {
    let config = load_config(None).unwrap();
    assert_eq!(config.preview_limit, 3);
    assert!(config.show_variables);
}

/// File hashing matches a known SHA-256 digest.
#[test]
fn sha256_file_matches_known_hash() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("abc.txt");
    std::fs::write(&path, b"abc").unwrap();
    assert_eq!(
        sha256_file(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
