use crate::{CacheKey, ConversionRecord, LoadOutcome};

use std::{collections::HashMap, sync::Arc};

/// In-memory records produced by successful pipeline executions.
#[derive(Debug, Default)]
pub(crate) struct ResultCache {
    conversions: HashMap<String, ConversionRecord>,
    samples: HashMap<CacheKey, Arc<[f32]>>,
}

impl ResultCache {
    /// Full hit: both the conversion and the exact resolution are cached.
    pub(crate) fn lookup(&self, key: &CacheKey) -> Option<LoadOutcome> {
        let record = self.conversions.get(&key.identity)?;
        let samples = self.samples.get(key)?;
        Some(LoadOutcome::new(key, record, Arc::clone(samples)))
    }

    pub(crate) fn conversion(&self, identity: &str) -> Option<&ConversionRecord> {
        self.conversions.get(identity)
    }

    /// Store a completed execution. An existing conversion record is kept.
    pub(crate) fn store(&mut self, key: CacheKey, record: ConversionRecord, samples: Arc<[f32]>) {
        self.conversions
            .entry(key.identity.clone())
            .or_insert(record);
        self.samples.insert(key, samples);
    }

    /// Drop every record of one identity, returning its conversion.
    pub(crate) fn evict(&mut self, identity: &str) -> Option<ConversionRecord> {
        self.samples.retain(|key, _| key.identity != identity);
        self.conversions.remove(identity)
    }

    pub(crate) fn clear(&mut self) {
        self.conversions.clear();
        self.samples.clear();
    }

    pub(crate) fn conversion_count(&self) -> usize {
        self.conversions.len()
    }

    pub(crate) fn sample_set_count(&self) -> usize {
        self.samples.len()
    }
}
