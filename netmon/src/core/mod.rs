//! Core internal logic for classification.
//!
//! This module contains the radio generation lookup, the pure path
//! classifier and the serialized worker that owns the monitor state.

pub(crate) mod classifier;
pub(crate) mod radio;
pub(crate) mod worker;
