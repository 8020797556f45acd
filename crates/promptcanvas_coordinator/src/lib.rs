//! Stack coordination for promptcanvas.
//!
//! [`StackCoordinator`] is the single owner of canvas state. It applies edits
//! from the presentation layer to a [`StackBoard`] and runs generation for one
//! stack or for all of them concurrently, writing every result (or error text)
//! into the stack's Response card.

mod board;
mod config;
mod coordinator;
mod outcome;
mod tracker;

pub use board::{GenerationInputs, StackBoard};
pub use config::{
    CoordinatorConfig, CoordinatorConfigBuilder, DEFAULT_COMPARISON_OFFSET_X, DEFAULT_HOST,
    DEFAULT_MODEL, HOST_ENV, MODEL_ENV, PROMPT_ENV,
};
pub use coordinator::StackCoordinator;
pub(crate) use outcome::BatchClock;
pub use outcome::{
    BatchProgress, GenerationOutcome, ValidationFailure, elapsed_millis, unreachable_message,
};
pub(crate) use tracker::GenerationTracker;
