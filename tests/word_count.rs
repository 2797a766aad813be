mod common;

use common::initialize_logger;
use recency_table::{build_word_counts, count_words, RecencyTable, TableError};

const TEXT: &str = "it was the best of times it was the worst of times \
                    it was the age of wisdom it was the age of foolishness";

// Test: counts over a short passage, duplicates collapse into one entry.
#[test]
fn counts_passage() {
    initialize_logger();
    let t = build_word_counts(TEXT.split_whitespace(), 64).unwrap();
    assert_eq!(t.get("it"), Ok(&4));
    assert_eq!(t.get("was"), Ok(&4));
    assert_eq!(t.get("the"), Ok(&4));
    assert_eq!(t.get("of"), Ok(&4));
    assert_eq!(t.get("times"), Ok(&2));
    assert_eq!(t.get("foolishness"), Ok(&1));
    assert_eq!(t.get("absent"), Err(TableError::NotFound));
    assert_eq!(t.len(), 10);
    let total: u64 = t.iter().map(|(_, c)| *c).sum();
    assert_eq!(total as usize, TEXT.split_whitespace().count());
}

// Test: the last token is the most recent change; "best" was seen once,
// early, and every other early word was touched again later.
#[test]
fn recency_after_load() {
    initialize_logger();
    let t = build_word_counts(TEXT.split_whitespace(), 64).unwrap();
    let (k, v) = t.get_last().unwrap();
    assert_eq!((k.as_str(), *v), ("foolishness", 1));
    let (k, v) = t.get_first().unwrap();
    assert_eq!((k.as_str(), *v), ("best", 1));
}

// Test: loading can resume into an existing table.
#[test]
fn incremental_loading() {
    initialize_logger();
    let mut t = RecencyTable::new(16).unwrap();
    assert_eq!(count_words(&mut t, ["a", "b"]), Ok(2));
    assert_eq!(count_words(&mut t, vec!["a".to_string()]), Ok(1));
    assert_eq!(t.get("a"), Ok(&2));
    assert_eq!(t.get_first().map(|(k, _)| k.as_str()), Ok("b"));
}

// Test: vocabulary larger than capacity surfaces Full.
#[test]
fn vocabulary_overflow_is_full() {
    initialize_logger();
    let words = (0..10).map(|i| format!("w{i}"));
    let r = build_word_counts(words, 8);
    assert_eq!(r.err(), Some(TableError::Full));
}
