#![forbid(unsafe_code)]

//! Chord diagram input model (headless).
//!
//! A chord diagram is described by a square adjacency matrix and one label per row. This crate
//! owns that model, reads it from JSON, JSON5 or YAML, validates it, and carries the untyped
//! configuration consumed by `chordgram-render`.

pub mod config;
pub mod error;
pub mod input;
pub mod model;

pub use config::ChordConfig;
pub use error::{Error, Result};
pub use input::{InputFormat, parse_chord_data, parse_entity_table};
pub use model::{ChordData, Entity, EntityTable};
