//! Bulk loader: word frequencies over an already-tokenized stream.
//!
//! Tokens arrive in document order. A repeated word is updated in place and
//! becomes the most recent entry, so after loading `get_last` is the word
//! whose count changed last and `get_first` the one left untouched longest.

use crate::error::TableError;
use crate::table::RecencyTable;
use core::hash::BuildHasher;
use log::debug;

/// Feed `words` into `table`, counting occurrences. Returns the number of
/// tokens consumed.
///
/// Stops at the first `Full` error; tokens before it stay counted.
pub fn count_words<I, W, S>(
    table: &mut RecencyTable<String, u64, S>,
    words: I,
) -> Result<usize, TableError>
where
    I: IntoIterator<Item = W>,
    W: AsRef<str>,
    S: BuildHasher,
{
    let mut consumed = 0usize;
    for word in words {
        let word = word.as_ref();
        let next = match table.get(word) {
            Ok(&count) => count + 1,
            Err(TableError::NotFound) => 1,
            Err(e) => return Err(e),
        };
        table.insert(word.to_owned(), next)?;
        consumed += 1;
    }
    debug!(
        "counted {} tokens, {} unique words, load factor {:.3}",
        consumed,
        table.len(),
        table.load_factor()
    );
    Ok(consumed)
}

/// Build a fresh word-count table of `capacity` slots from `words`.
///
/// `capacity` should exceed the expected number of distinct words.
pub fn build_word_counts<I, W>(
    words: I,
    capacity: usize,
) -> Result<RecencyTable<String, u64>, TableError>
where
    I: IntoIterator<Item = W>,
    W: AsRef<str>,
{
    let mut table = RecencyTable::new(capacity)?;
    count_words(&mut table, words)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_repeated_words() {
        let words = "the cat saw the dog and the cat".split_whitespace();
        let t = build_word_counts(words, 16).unwrap();
        assert_eq!(t.len(), 5);
        assert_eq!(t.get("the"), Ok(&3));
        assert_eq!(t.get("cat"), Ok(&2));
        assert_eq!(t.get("dog"), Ok(&1));
    }

    /// Invariant: the last changed word is most recent; an early word that
    /// is never repeated drifts to least recent.
    #[test]
    fn recency_follows_last_change() {
        let t = build_word_counts(["a", "b", "a", "c", "b"], 8).unwrap();
        assert_eq!(t.get_last(), Ok((&"b".to_string(), &2)));
        assert_eq!(t.get_first(), Ok((&"a".to_string(), &2)));
    }

    #[test]
    fn full_table_stops_the_load() {
        let mut t = RecencyTable::new(2).unwrap();
        let r = count_words(&mut t, ["x", "y", "x", "z", "w"]);
        assert_eq!(r, Err(TableError::Full));
        assert_eq!(t.get("x"), Ok(&2));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn zero_capacity_propagates() {
        let r = build_word_counts(Vec::<String>::new(), 0);
        assert_eq!(r.err(), Some(TableError::InvalidArgument));
    }

    #[test]
    fn empty_stream_leaves_empty_table() {
        let mut t = RecencyTable::new(4).unwrap();
        assert_eq!(count_words(&mut t, Vec::<&str>::new()), Ok(0));
        assert_eq!(t.get_last(), Err(TableError::Empty));
    }
}
