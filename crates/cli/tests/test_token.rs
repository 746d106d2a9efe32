use wayfare_cli::token::{load_token_in, mask, remove_token_in, save_token_in};

#[test]
fn save_and_load_token_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    save_token_in(tmp.path(), "  tok-123  ").unwrap();
    assert_eq!(load_token_in(tmp.path()).as_deref(), Some("tok-123"));
}

#[test]
fn missing_token_file_returns_none() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(load_token_in(tmp.path()).is_none());
}

#[test]
fn whitespace_token_file_returns_none() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("token"), "   \n").unwrap();
    assert!(load_token_in(tmp.path()).is_none());
}

#[test]
fn empty_token_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(save_token_in(tmp.path(), "   ").is_err());
    assert!(load_token_in(tmp.path()).is_none());
}

#[test]
fn remove_token_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    save_token_in(tmp.path(), "tok").unwrap();
    remove_token_in(tmp.path()).unwrap();
    remove_token_in(tmp.path()).unwrap();
    assert!(load_token_in(tmp.path()).is_none());
}

#[test]
fn mask_keeps_last_four() {
    assert_eq!(mask("abcdefgh"), "****efgh");
    assert_eq!(mask("abc"), "abc");
    assert_eq!(mask(""), "");
}
