//! Settings for allegro: output volume, display options, where the track
//! catalog comes from, and logging.
//!
//! Values come from the environment, then the config file, then defaults.
//! See [`Settings::load`].

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
