use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use tokio::fs;

/// Minimal built-in word set used when no word list file is available.
/// Validation applies to it exactly as strictly as to a loaded list.
const FALLBACK_WORDS: &[&str] = &[
    "AN", "ART", "AUTO", "BAUM", "BROT", "CHEF", "DU", "EI", "EIS", "ER", "ES", "HALLO", "HASE",
    "HAUS", "IN", "JA", "NASE", "NEIN", "RAT", "REIS", "ROSE", "SEE", "SPIEL", "STERN", "TEE",
    "TOR", "WELT", "WIR", "WORT",
];

/// The set of playable words, compared uppercase
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Load a newline-delimited word list from a file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let words: HashSet<String> = content
            .lines()
            .map(|line| line.trim().to_uppercase())
            .filter(|word| !word.is_empty() && word.len() >= 2)
            .collect();

        tracing::info!("Loaded {} words into dictionary", words.len());

        Ok(Self { words })
    }

    /// The built-in word set for running without a word list file
    pub fn fallback() -> Self {
        Self {
            words: FALLBACK_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Check if a word exists in the dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_dictionary() {
        let dict = Dictionary::fallback();
        assert!(!dict.is_empty());
        assert!(dict.contains("CHEF"));
        assert!(dict.contains("chef"));
        assert!(!dict.contains("XQZV"));
    }

    #[test]
    fn test_fallback_holds_the_bot_opener() {
        // The scripted bot opening word has to be playable
        assert!(Dictionary::fallback().contains("CHEF"));
    }
}
