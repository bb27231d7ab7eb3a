//! Generator-backed source: the pure-mock mode and the fallback path.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use ecu_core::Reading;

use crate::synthetic::SyntheticGenerator;

use super::{DataSource, ReadingQuery, SourceError};

pub struct SyntheticSource {
    generator: Mutex<SyntheticGenerator>,
}

impl SyntheticSource {
    pub fn new(generator: SyntheticGenerator) -> Self {
        Self {
            generator: Mutex::new(generator),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SyntheticGenerator::seeded(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SyntheticGenerator::from_entropy())
    }

    /// Synchronous variant used by the engine's fallback path.
    pub fn generate(&self, query: &ReadingQuery) -> Vec<Reading> {
        self.generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate(query.limit, query.to)
    }
}

#[async_trait]
impl DataSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn fetch(&self, query: &ReadingQuery) -> Result<Vec<Reading>, SourceError> {
        Ok(self.generate(query))
    }
}
