//! Rule-table complexity classifier

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ClassifierConfig;
use crate::domain::llm::Conversation;

/// Coarse difficulty signal that selects the routing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLabel {
    Simple,
    Complex,
}

impl ComplexityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for ComplexityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single predicate in the rule table; any match yields `Complex`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Lowercased text contains any keyword as a substring
    Keywords { name: String, keywords: Vec<String> },
    /// Text is longer than `chars` characters
    LongerThan { name: String, chars: usize },
}

impl ClassificationRule {
    pub fn name(&self) -> &str {
        match self {
            Self::Keywords { name, .. } | Self::LongerThan { name, .. } => name,
        }
    }

    /// `lowered` must be the lowercase form of `text`
    fn matches(&self, text: &str, lowered: &str) -> bool {
        match self {
            Self::Keywords { keywords, .. } => keywords
                .iter()
                .any(|keyword| lowered.contains(keyword.to_lowercase().as_str())),
            Self::LongerThan { chars, .. } => text.chars().count() > *chars,
        }
    }
}

/// Outcome of classifying one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: ComplexityLabel,
    /// Name of the first rule that matched
    pub matched_rule: Option<String>,
}

impl Classification {
    pub fn simple() -> Self {
        Self {
            label: ComplexityLabel::Simple,
            matched_rule: None,
        }
    }

    pub fn complex(rule: impl Into<String>) -> Self {
        Self {
            label: ComplexityLabel::Complex,
            matched_rule: Some(rule.into()),
        }
    }
}

/// Maps a conversation to a complexity label
pub trait Classifier: Send + Sync {
    fn classify(&self, conversation: &Conversation) -> Classification;
}

/// Ordered rule table evaluated with short-circuit
#[derive(Debug, Clone)]
pub struct RuleTableClassifier {
    rules: Vec<ClassificationRule>,
}

impl RuleTableClassifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// Keyword groups in configured order, then the length rule
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let mut rules: Vec<ClassificationRule> = config
            .keyword_groups
            .iter()
            .map(|group| ClassificationRule::Keywords {
                name: group.name.clone(),
                keywords: group.keywords.clone(),
            })
            .collect();

        rules.push(ClassificationRule::LongerThan {
            name: "length".to_string(),
            chars: config.length_threshold,
        });

        Self::new(rules)
    }

    /// Classify raw text directly
    pub fn classify_text(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(text, &lowered))
            .map(|rule| Classification::complex(rule.name()))
            .unwrap_or_else(Classification::simple)
    }
}

impl Default for RuleTableClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl Classifier for RuleTableClassifier {
    fn classify(&self, conversation: &Conversation) -> Classification {
        self.classify_text(&conversation.combined_text())
    }
}
