//! Averaged word-vector embeddings
//!
//! Table format (GloVe style text, one word per line):
//! ```text
//! cats 0.91 0.10 0.02
//! dogs 0.80 0.21 0.00
//! ```
//! An optional word2vec style `<count> <dims>` header line is ignored.
//! The first usable line fixes the dimensionality; later lines with a
//! different length, or with values that are not finite numbers, are
//! skipped.

use super::{EmbeddingProvider, LoadError};
use std::collections::HashMap;
use std::path::Path;

/// Word -> vector table, keyed by lowercase word
#[derive(Debug, Clone)]
pub struct WordVectors {
    dims: usize,
    table: HashMap<String, Vec<f64>>,
}

impl WordVectors {
    /// Load a table from a file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse_named(&contents, &path.display().to_string())
    }

    /// Build a table from in-memory text
    pub fn parse(contents: &str) -> Result<Self, LoadError> {
        Self::parse_named(contents, "<inline>")
    }

    fn parse_named(contents: &str, name: &str) -> Result<Self, LoadError> {
        let mut dims: Option<usize> = None;
        let mut table: HashMap<String, Vec<f64>> = HashMap::new();
        let mut skipped = 0usize;
        let mut seen_content = false;

        for line in contents.lines() {
            let mut tokens = line.split_whitespace();
            let Some(word) = tokens.next() else {
                continue;
            };
            let rest: Vec<&str> = tokens.collect();

            if !seen_content {
                seen_content = true;
                if is_count_header(word, &rest) {
                    continue;
                }
            }

            let values: Result<Vec<f64>, _> = rest.iter().map(|t| t.parse::<f64>()).collect();
            let values = match values {
                Ok(values) if !values.is_empty() && values.iter().all(|v| v.is_finite()) => {
                    values
                }
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let expected = *dims.get_or_insert(values.len());
            if values.len() != expected {
                skipped += 1;
                continue;
            }

            table.entry(word.to_lowercase()).or_insert(values);
        }

        let Some(dims) = dims else {
            return Err(LoadError::Empty {
                name: name.to_string(),
            });
        };

        if skipped > 0 {
            tracing::debug!(source = %name, skipped, "Skipped malformed embedding lines");
        }
        tracing::info!(
            source = %name,
            words = table.len(),
            dims,
            "Loaded word vectors"
        );

        Ok(Self { dims, table })
    }
}

/// `400000 300` style header of word2vec text files
fn is_count_header(first: &str, rest: &[&str]) -> bool {
    rest.len() == 1 && first.parse::<u64>().is_ok() && rest[0].parse::<u64>().is_ok()
}

impl EmbeddingProvider for WordVectors {
    fn embed(&self, text: &str) -> Vec<f64> {
        let mut sum = vec![0.0; self.dims];
        let mut hits = 0usize;

        for token in text.to_lowercase().split_whitespace() {
            if let Some(vector) = self.table.get(token) {
                for (acc, value) in sum.iter_mut().zip(vector) {
                    *acc += value;
                }
                hits += 1;
            }
        }

        if hits > 0 {
            let n = hits as f64;
            sum.iter_mut().for_each(|acc| *acc /= n);
        }

        sum
    }

    fn dimensionality(&self) -> usize {
        self.dims
    }

    fn vocabulary_size(&self) -> usize {
        self.table.len()
    }
}
