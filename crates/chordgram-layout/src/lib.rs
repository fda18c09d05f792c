#![forbid(unsafe_code)]

//! Headless chord diagram geometry.
//!
//! [`ChordGenerator`] turns a square weight matrix into group arcs and chords, [`ArcGenerator`]
//! and [`RibbonGenerator`] turn those into SVG path data, and [`group_ticks`] places value ticks
//! along a group. Angles are radians measured clockwise from 12 o'clock; path data is emitted
//! with JavaScript number formatting so output matches d3 byte for byte.

pub mod arc;
pub mod chord;
pub mod error;
pub mod geom;
pub mod path;
pub mod ribbon;
pub mod ticks;

pub use arc::ArcGenerator;
pub use chord::{Chord, ChordGenerator, ChordGroup, ChordLayout, ChordSubgroup, SortOrder};
pub use error::{Error, Result};
pub use ribbon::RibbonGenerator;
pub use ticks::{GroupTicks, MAX_TICKS_PER_GROUP, Tick, group_ticks, tick_count};
