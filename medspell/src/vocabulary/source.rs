//! Tab-separated dictionary files.
//!
//! Malformed rows are logged and skipped; only a file that cannot be
//! opened or read is an error.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Vocabulary;
use crate::tokenizer::Syllable;

/// Errors that can occur while reading dictionary files.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The file could not be opened
    #[error("Failed to open '{0}'")]
    Open(String, #[source] csv::Error),

    /// The file could not be read to the end
    #[error("Failed to read '{0}'")]
    Read(String, #[source] csv::Error),
}

fn rows(path: &Path) -> Result<Vec<csv::StringRecord>, SourceError> {
    let name = path.display().to_string();
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SourceError::Open(name.clone(), e))?;

    let mut out = vec![];
    for record in rdr.records() {
        match record {
            Ok(r) => out.push(r),
            Err(e) if e.is_io_error() => return Err(SourceError::Read(name, e)),
            Err(e) => log::warn!("{}: skipping malformed row: {}", name, e),
        }
    }

    log::debug!("{}: {} rows", name, out.len());
    Ok(out)
}

/// Reads `term \t category` records.
pub fn load_vocabulary(vocabulary: &mut Vocabulary, path: &Path) -> Result<(), SourceError> {
    for row in rows(path)? {
        match (row.get(0), row.get(1)) {
            (Some(term), Some(category)) => vocabulary.add_record(term.trim(), category.trim()),
            _ => log::warn!("{}: missing category in {:?}", path.display(), row),
        }
    }
    Ok(())
}

/// Reads one matchable term per line.
pub fn load_custom_terms(vocabulary: &mut Vocabulary, path: &Path) -> Result<(), SourceError> {
    for row in rows(path)? {
        if let Some(term) = row.get(0) {
            vocabulary.add_term(term.trim());
        }
    }
    Ok(())
}

/// Reads terms that must match the whole input; first column only.
pub fn load_filter_rules(vocabulary: &mut Vocabulary, path: &Path) -> Result<(), SourceError> {
    for row in rows(path)? {
        if let Some(term) = row.get(0) {
            vocabulary.add_exact_length_rule(term.trim());
        }
    }
    Ok(())
}

/// Reads ordered `bad \t good` substring replacements.
pub fn load_replacements(path: &Path) -> Result<Vec<(String, String)>, SourceError> {
    Ok(rows(path)?
        .into_iter()
        .filter_map(|r| {
            r.get(0)
                .and_then(|x| r.get(1).map(|y| (x.to_string(), y.to_string())))
        })
        .filter(|(bad, _)| !bad.is_empty())
        .collect())
}

/// Reads a `syllable \t initial \t final` inventory.
pub fn load_syllables(path: &Path) -> Result<Vec<Syllable>, SourceError> {
    Ok(rows(path)?
        .into_iter()
        .filter_map(|r| match (r.get(0), r.get(1), r.get(2)) {
            (Some(full), Some(initial), Some(rhyme)) => {
                let syllable = Syllable::new(initial, rhyme);
                if syllable.full != full {
                    log::warn!("{} is listed as {}", full, syllable.full);
                }
                Some(syllable)
            }
            _ => None,
        })
        .collect())
}

/// Locations of the dictionary files; every one is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryPaths {
    /// `term \t category`
    pub vocabulary: Option<PathBuf>,
    /// one term per line
    pub custom: Option<PathBuf>,
    /// exact-length terms
    pub filter_rules: Option<PathBuf>,
    /// `bad \t good`
    pub replacements: Option<PathBuf>,
    /// `syllable \t initial \t final`
    pub syllables: Option<PathBuf>,
}

/// Everything read from a [`DictionaryPaths`].
#[derive(Debug, Clone, Default)]
pub struct Dictionaries {
    /// matchable and retained terms
    pub vocabulary: Vocabulary,
    /// preprocessing replacements, applied in order
    pub replacements: Vec<(String, String)>,
    /// syllable inventory replacing the transliterator's own
    pub syllables: Option<Vec<Syllable>>,
}

impl DictionaryPaths {
    /// Loads every configured file. Filter rules are read before terms.
    pub fn load(&self) -> Result<Dictionaries, SourceError> {
        let mut vocabulary = Vocabulary::new();

        if let Some(path) = &self.filter_rules {
            load_filter_rules(&mut vocabulary, path)?;
        }
        if let Some(path) = &self.vocabulary {
            load_vocabulary(&mut vocabulary, path)?;
        }
        if let Some(path) = &self.custom {
            load_custom_terms(&mut vocabulary, path)?;
        }

        let replacements = match &self.replacements {
            Some(path) => load_replacements(path)?,
            None => vec![],
        };

        let syllables = match &self.syllables {
            Some(path) => Some(load_syllables(path)?),
            None => None,
        };

        Ok(Dictionaries {
            vocabulary,
            replacements,
            syllables,
        })
    }
}
