pub mod config;
pub mod pattern;
pub mod sequence;
pub mod time;
pub mod timeline;

pub use crate::pattern::{Pattern, Step};
pub use crate::sequence::{Sequence, SequenceError};
