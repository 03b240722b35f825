//! Ordered backend policy and cost table

use std::collections::HashMap;

use super::RoutingConfig;
use crate::domain::classifier::ComplexityLabel;

/// Ordered candidate backends per complexity label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPolicy {
    complex: Vec<String>,
    simple: Vec<String>,
}

impl RoutingPolicy {
    pub fn new(complex: Vec<String>, simple: Vec<String>) -> Self {
        Self { complex, simple }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.complex.clone(), config.simple.clone())
    }

    /// Configured order for a label, regardless of availability
    pub fn order(&self, label: ComplexityLabel) -> &[String] {
        match label {
            ComplexityLabel::Complex => &self.complex,
            ComplexityLabel::Simple => &self.simple,
        }
    }

    /// Backends to try for a label, keeping only those that are registered
    pub fn candidates<F>(&self, label: ComplexityLabel, is_registered: F) -> Vec<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.order(label)
            .iter()
            .map(String::as_str)
            .filter(|id| is_registered(id))
            .collect()
    }

    /// Every backend id mentioned by either list
    pub fn referenced_backends(&self) -> impl Iterator<Item = &str> {
        self.complex
            .iter()
            .chain(self.simple.iter())
            .map(String::as_str)
    }
}

/// Per-backend cost used for the savings estimate
#[derive(Debug, Clone)]
pub struct CostTable {
    reference_cost: f64,
    reference_model: String,
    per_backend: HashMap<String, f64>,
}

impl CostTable {
    pub fn new(reference_cost: f64, reference_model: impl Into<String>) -> Self {
        Self {
            reference_cost,
            reference_model: reference_model.into(),
            per_backend: HashMap::new(),
        }
    }

    pub fn with_cost(mut self, backend: impl Into<String>, cost: f64) -> Self {
        self.per_backend.insert(backend.into(), cost);
        self
    }

    pub fn reference_cost(&self) -> f64 {
        self.reference_cost
    }

    pub fn reference_model(&self) -> &str {
        &self.reference_model
    }

    /// Unknown backends cost the reference
    pub fn cost_of(&self, backend: &str) -> f64 {
        self.per_backend
            .get(backend)
            .copied()
            .unwrap_or(self.reference_cost)
    }

    /// Never negative
    pub fn savings_for(&self, backend: &str) -> f64 {
        (self.reference_cost - self.cost_of(backend)).max(0.0)
    }

    /// A cache hit avoids the reference call entirely
    pub fn cache_hit_savings(&self) -> f64 {
        self.reference_cost
    }
}
