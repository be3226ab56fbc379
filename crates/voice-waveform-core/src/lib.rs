//! Voice Waveform Core Library
//!
//! Turns voice and audio chat attachments into a canonical playable file, its
//! duration and an amplitude summary at any requested resolution. Results are
//! cached per attachment and resolution, concurrent identical requests share
//! one execution, and all processing is serialized on a single worker.
//!
//! Decryption, codec conversion and waveform sampling are supplied by the
//! host through [`AttachmentSource`], [`AudioConverter`] and
//! [`WaveformSampler`].
//!
//! # Example
//!
//! ```no_run
//! use voice_waveform_core::{
//!     AttachmentSource, AudioConverter, CacheConfig, CoreResult, WaveformCoordinator,
//!     WaveformSampler,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn show_waveform(
//!     converter: Arc<dyn AudioConverter>,
//!     sampler: Arc<dyn WaveformSampler>,
//!     attachment: Arc<dyn AttachmentSource>,
//! ) -> CoreResult<()> {
//!     let coordinator = WaveformCoordinator::new(CacheConfig::default(), converter, sampler)?;
//!
//!     match coordinator.load(attachment, 64).await {
//!         Ok(outcome) => println!("{:?}: {} samples", outcome.duration, outcome.samples.len()),
//!         Err(e) => eprintln!("Waveform unavailable: {e}"),
//!     }
//!
//!     coordinator.clear_cache().await;
//!     Ok(())
//! }
//! ```

mod attachment;
mod cache;
mod config;
mod coordinator;
mod error;
mod media;
mod storage;

pub use {
    attachment::{AttachmentKind, AttachmentSource},
    cache::{CacheKey, CacheStats, ConversionRecord, LoadOutcome},
    config::{CacheConfig, StorageConfig, WorkerConfig},
    coordinator::{Completion, LoadResult, WaveformCoordinator},
    error::{ErrorKind, Result as CoreResult, SharedError, WaveformError},
    media::{AudioConverter, StageError, WaveformSampler},
    storage::TemporaryStorage,
};

#[cfg(test)]
mod tests;
