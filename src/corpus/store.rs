/*!
 * Repository layer for word corpus operations.
 *
 * This module provides a high-level API over the words table, abstracting
 * away the SQL details. Lookups return every occurrence of a word in
 * insertion order; candidate ranking happens in the selector, not here.
 */

use anyhow::Result;
use log::{debug, warn};
use rusqlite::params;

use super::connection::CorpusConnection;
use super::models::{CorpusEntry, NewCorpusEntry};

/// Repository for corpus operations
#[derive(Clone)]
pub struct WordCorpus {
    /// Database connection
    db: CorpusConnection,
}

impl WordCorpus {
    /// Create a new corpus over the given connection
    pub fn new(db: CorpusConnection) -> Self {
        Self { db }
    }

    /// Open (or create) a corpus database at the given path
    pub fn open<P: AsRef<std::path::Path>>(db_path: P) -> Result<Self> {
        let db = CorpusConnection::new(db_path)?;
        Ok(Self::new(db))
    }

    /// Create a corpus with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = CorpusConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Insert donor occurrences in one transaction.
    ///
    /// Entries with non-positive duration or an empty word are malformed
    /// input: they are skipped with a warning and never reach matching.
    /// Returns the number of rows actually inserted.
    pub fn insert_entries(&self, entries: &[NewCorpusEntry]) -> Result<usize> {
        let mut inserted = 0;

        self.db.transaction(|tx| {
            for entry in entries {
                if entry.word.is_empty() || !(entry.end > entry.start) {
                    warn!(
                        "Skipping malformed corpus record {:?} ({} -> {})",
                        entry.word, entry.start, entry.end
                    );
                    continue;
                }

                tx.execute(
                    "INSERT INTO words (word, file, start, end) VALUES (?1, ?2, ?3, ?4)",
                    params![
                        entry.word,
                        entry.source_file,
                        entry.start.to_string(),
                        entry.end.to_string(),
                    ],
                )?;
                inserted += 1;
            }
            Ok(())
        })?;

        debug!("Inserted {} corpus entries", inserted);
        Ok(inserted)
    }

    /// Look up every occurrence of a normalized word.
    ///
    /// Returns all matching entries in insertion (rowid) order, possibly
    /// empty. Rows whose stored timestamps fail to parse or violate
    /// `end > start` are filtered out with a warning.
    pub fn lookup(&self, word: &str) -> Result<Vec<CorpusEntry>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, word, file, start, end FROM words WHERE word = ?1 ORDER BY id",
            )?;

            let rows = stmt.query_map([word], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                let (id, word, source_file, start_text, end_text) = row?;

                let (Ok(start), Ok(end)) = (start_text.parse::<f64>(), end_text.parse::<f64>())
                else {
                    warn!(
                        "Dropping corpus row {} with unparsable timestamps ({:?}, {:?})",
                        id, start_text, end_text
                    );
                    continue;
                };

                if !(end > start) {
                    warn!("Dropping corpus row {} with non-positive duration", id);
                    continue;
                }

                entries.push(CorpusEntry {
                    id,
                    word,
                    source_file,
                    start,
                    end,
                });
            }

            Ok(entries)
        })
    }

    /// Total number of stored occurrences
    pub fn len(&self) -> Result<i64> {
        self.db.execute(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?)
        })
    }

    /// True if the corpus holds no occurrences
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove every stored occurrence and reclaim the freed pages, so a
    /// fresh build starts from a compact database file
    pub fn clear(&self) -> Result<()> {
        self.db.execute(|conn| {
            conn.execute("DELETE FROM words", [])?;
            Ok(())
        })?;
        self.db.vacuum()
    }

    /// Paths of all distinct donor files referenced by the corpus
    pub fn source_files(&self) -> Result<Vec<String>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT file FROM words ORDER BY file")?;
            let files = stmt
                .query_map([], |row| row.get(0))?
                .filter_map(|r| r.ok())
                .collect();
            Ok(files)
        })
    }
}
