//! Audio handles: the contract the playback controller drives, and its
//! `rodio` implementation.

mod rodio_engine;
mod types;

pub use rodio_engine::RodioEngine;
pub use types::*;
