//! Model registry
//!
//! Maps identifiers to [`ModelSpec`]s. Fallbacks are checked when the
//! registry is built so that lookups at request time never dangle.

use crate::errors::{GatewayError, Result};
use crate::models::types::ModelSpec;
use std::collections::HashMap;

/// Static identifier → spec mapping, preserving declaration order
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    specs: Vec<ModelSpec>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Build a registry, rejecting duplicate ids and unresolvable fallbacks
    pub fn new(specs: Vec<ModelSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            if spec.id.trim().is_empty() {
                return Err(GatewayError::Config("model id must not be empty".to_string()));
            }
            if index.insert(spec.id.clone(), position).is_some() {
                return Err(GatewayError::Config(format!(
                    "model '{}' is declared more than once",
                    spec.id
                )));
            }
        }

        for spec in &specs {
            if let Some(fallback) = &spec.fallback {
                if fallback == &spec.id {
                    return Err(GatewayError::Config(format!(
                        "model '{}' cannot fall back to itself",
                        spec.id
                    )));
                }
                if !index.contains_key(fallback) {
                    return Err(GatewayError::Config(format!(
                        "fallback '{}' of model '{}' is not registered",
                        fallback, spec.id
                    )));
                }
            }
        }

        Ok(Self { specs, index })
    }

    /// Look up a model by identifier
    pub fn get(&self, id: &str) -> Option<&ModelSpec> {
        self.index.get(id).map(|&position| &self.specs[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Spec of the model substituted for `spec`, one level deep
    pub fn fallback_for(&self, spec: &ModelSpec) -> Option<&ModelSpec> {
        spec.fallback.as_deref().and_then(|id| self.get(id))
    }

    /// Resolve every identifier, failing on the first unknown one
    pub fn resolve_all<'a>(&'a self, ids: &[String]) -> Result<Vec<&'a ModelSpec>> {
        ids.iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| GatewayError::validation(format!("Unknown model: {}", id)))
            })
            .collect()
    }

    /// All specs in declaration order
    pub fn specs(&self) -> &[ModelSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for ModelRegistry {
    /// The two OpenAI chat models the demo UI offers
    fn default() -> Self {
        Self::new(vec![
            ModelSpec::new("gpt-4").with_fallback("gpt-3.5-turbo"),
            ModelSpec::new("gpt-3.5-turbo"),
        ])
        .expect("built-in model registry is consistent")
    }
}
