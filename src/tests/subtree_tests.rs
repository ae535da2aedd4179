use super::*;

fn cs() -> Subtree {
    Subtree::new("cstrike").unwrap()
}

#[test]
fn containment_is_prefix_exact() {
    let s = cs();
    assert!(s.contains("cstrike"));
    assert!(s.contains("cstrike/foo"));
    assert!(!s.contains("cstrikex/foo"));
    assert!(!s.contains("cstrikex"));
    assert!(!s.contains("other/cstrike/foo"));
    assert!(!s.contains_strictly("cstrike"));
}

#[test]
fn display_name_strips_root_prefix() {
    let s = cs();
    assert_eq!(s.display_name("cstrike/maps/de_dust2.bsp"), "maps/de_dust2.bsp");
    assert_eq!(s.display_name("cstrike"), "");
}

#[test]
fn validate_rejects_traversal_and_outside_paths() {
    let s = cs();
    for bad in [
        "cstrike/../etc/passwd",
        "cstrike/maps/..",
        "/cstrike/a.txt",
        "cstrikex/a.txt",
        "other/a.txt",
        "cstrike",
        "cstrike//a.txt",
        "",
    ] {
        let err = s.validate(bad).unwrap_err();
        assert!(
            matches!(err, TreeError::InvalidPath { .. }),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn validate_names_the_root_itself() {
    for path in ["cstrike", "cstrike/"] {
        match cs().validate(path).unwrap_err() {
            TreeError::InvalidPath { reason, .. } => {
                assert!(reason.contains("root itself"), "{}", reason);
                assert!(!reason.contains("outside"), "{}", reason);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn validate_normalizes_trailing_separator() {
    let s = cs();
    assert_eq!(s.validate("cstrike/maps/").unwrap(), "cstrike/maps");
    assert_eq!(s.validate("cstrike/a.txt").unwrap(), "cstrike/a.txt");
}

#[test]
fn rebase_substitutes_prefix() {
    assert_eq!(
        rebase("cstrike/maps/x/y.bsp", "cstrike/maps", "cstrike/old"),
        Some("cstrike/old/x/y.bsp".to_string())
    );
    assert_eq!(rebase("cstrike/mapsx/y.bsp", "cstrike/maps", "cstrike/old"), None);
    assert_eq!(parent_path("cstrike/maps/a"), Some("cstrike/maps"));
    assert_eq!(parent_path("cstrike"), None);
}
