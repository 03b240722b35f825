//! Complexity classification of incoming conversations

mod config;
mod rules;

pub use config::{ClassifierConfig, KeywordGroup};
pub use rules::{
    Classification, ClassificationRule, Classifier, ComplexityLabel, RuleTableClassifier,
};
