// src/core/registry.rs
//
// Static mapping from stage names to factories.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::{debug, warn};

use super::stage::{Stage, StageContext, StageParams};
use super::stages;
use crate::error::{Error, Result, StageError};

/// Builds a configured stage from its parameters
pub type StageFactory =
    fn(&mut StageParams, &StageContext) -> std::result::Result<Box<dyn Stage>, StageError>;

#[derive(Clone, Copy)]
struct Entry {
    factory: StageFactory,
    description: &'static str,
}

/// Name -> factory table.
///
/// Registration is first-come: a second `register` under an existing name
/// fails with `DuplicateStage` and leaves the first entry in place.
#[derive(Clone, Default)]
pub struct StageRegistry {
    entries: BTreeMap<String, Entry>,
}

impl StageRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in stage
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, description, factory) in stages::builtins() {
            if let Err(e) = registry.register(name, description, factory) {
                warn!("Skipping built-in stage: {}", e);
            }
        }
        debug!("Stage registry populated with {} built-ins", registry.len());
        registry
    }

    /// Process-wide registry of built-in stages, created on first use
    pub fn global() -> &'static StageRegistry {
        static GLOBAL: OnceLock<StageRegistry> = OnceLock::new();
        GLOBAL.get_or_init(StageRegistry::with_builtins)
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: &'static str,
        factory: StageFactory,
    ) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::DuplicateStage(name));
        }
        self.entries.insert(name, Entry { factory, description });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up `name` and build it. Unconsumed parameters are rejected.
    pub fn build(
        &self,
        name: &str,
        mut params: StageParams,
        ctx: &StageContext,
    ) -> std::result::Result<Box<dyn Stage>, StageError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| StageError::Unknown(name.to_string()))?;
        let stage = (entry.factory)(&mut params, ctx)?;
        params.finish()?;
        Ok(stage)
    }

    /// Registered names with their descriptions, sorted by name
    pub fn describe(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
