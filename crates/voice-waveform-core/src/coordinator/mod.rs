#[allow(clippy::module_inception)]
mod coordinator;
mod delivery;
mod pending;
pub(crate) mod pipeline;
mod stage;
mod worker;

pub(crate) use {
    coordinator::{CoordinatorState, Shared},
    delivery::DeliveryQueue,
    pending::{PendingRegistry, Waiter, resolve_all},
    pipeline::Pipeline,
    stage::{Stage, StageGuard},
    worker::{Job, Worker},
};

pub use coordinator::{Completion, LoadResult, WaveformCoordinator};
