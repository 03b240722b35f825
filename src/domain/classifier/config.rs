//! Classifier configuration

use serde::{Deserialize, Serialize};

/// A named list of keywords that mark a request as complex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Rule table settings for the complexity classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Conversations with more characters than this are complex
    #[serde(default = "default_length_threshold")]
    pub length_threshold: usize,

    /// Evaluated in order before the length rule
    #[serde(default = "default_keyword_groups")]
    pub keyword_groups: Vec<KeywordGroup>,
}

fn default_length_threshold() -> usize {
    800
}

fn default_keyword_groups() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(
            "coding",
            &["code", "function", "python", "javascript", "react", "sql"],
        ),
        KeywordGroup::new("creative", &["story", "poem", "essay", "novel", "haiku"]),
        KeywordGroup::new(
            "reasoning",
            &["logic", "reasoning", "solve", "math", "calculus"],
        ),
        KeywordGroup::new("analysis", &["analysis", "summary", "extract"]),
    ]
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            length_threshold: default_length_threshold(),
            keyword_groups: default_keyword_groups(),
        }
    }
}
