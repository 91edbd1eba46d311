use super::*;
use crate::foundation::core::FrameDims;
use serde_json::{Map, json};

fn input(text: &str, style: serde_json::Value) -> CompileInput {
    CompileInput {
        text: text.to_string(),
        style: style.as_object().cloned().unwrap_or_else(Map::new),
        frame: FrameDims::portrait_hd(),
        raster: None,
    }
}

#[test]
fn first_lookup_compiles_and_stores() {
    let mut store = InMemoryMetaStore::new();
    let mut compiler = Compiler::builtin();
    let key = MetaKey::new("s1", 0);
    let (meta, source) =
        load_or_compile(&mut store, &key, &input("Hello", json!({})), &mut compiler).unwrap();
    assert_eq!(source, MetaSource::Compiled);
    assert_eq!(store.get(&key).unwrap(), Some(meta));
}

#[test]
fn matching_stored_meta_is_reused() {
    let mut store = InMemoryMetaStore::new();
    let mut compiler = Compiler::builtin();
    let key = MetaKey::new("s1", 3);
    let req = input("Hello world", json!({ "fontPx": 64 }));
    let (first, _) = load_or_compile(&mut store, &key, &req, &mut compiler).unwrap();
    let (second, source) = load_or_compile(&mut store, &key, &req, &mut compiler).unwrap();
    assert_eq!(source, MetaSource::Stored);
    assert_eq!(first, second);
    assert_eq!(store.len(), 1);
}

#[test]
fn stale_meta_is_replaced() {
    let mut store = InMemoryMetaStore::new();
    let mut compiler = Compiler::builtin();
    let key = MetaKey::new("s2", 1);
    load_or_compile(&mut store, &key, &input("Hello", json!({})), &mut compiler).unwrap();

    let restyled = input("Hello", json!({ "letterSpacingPx": 4 }));
    let (meta, source) = load_or_compile(&mut store, &key, &restyled, &mut compiler).unwrap();
    assert_eq!(source, MetaSource::Replaced);
    assert_eq!(meta.effective_style.letter_spacing_px, 4.0);
    assert_eq!(store.get(&key).unwrap(), Some(meta));
}

#[test]
fn compile_errors_leave_store_untouched() {
    let mut store = InMemoryMetaStore::new();
    let mut compiler = Compiler::builtin();
    let key = MetaKey::new("s3", 0);
    let err = load_or_compile(&mut store, &key, &input("  ", json!({})), &mut compiler).unwrap_err();
    assert_eq!(err.code(), "EMPTY_TEXT");
    assert!(store.is_empty());
}

#[test]
fn keys_display_session_and_beat() {
    assert_eq!(MetaKey::new("abc", 7).to_string(), "abc#7");
}
