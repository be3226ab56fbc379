mod cache_key;
mod cache_stats;
mod conversion_record;
mod load_outcome;
mod result_cache;

pub(crate) use result_cache::ResultCache;

pub use {
    cache_key::CacheKey, cache_stats::CacheStats, conversion_record::ConversionRecord,
    load_outcome::LoadOutcome,
};
