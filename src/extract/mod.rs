//! Date extraction from announcement text.
//!
//! # Submodules
//!
//! - [`normalize`]: Ordinal-suffix stripping ("31st" -> "31")
//! - [`patterns`]: The authoritative, priority-ordered date shapes
//! - [`entities`]: Entity recognition over a lexicon model (diagnostic only)
//! - [`resolver`]: Title-then-description retirement date policy
//!
//! Only [`resolver::resolve_retirement_date`] decides the retirement date.
//! Entity spans are recorded next to it for inspection but never change it.

pub mod entities;
pub mod normalize;
pub mod patterns;
pub mod resolver;

pub use entities::{EntityRecognizer, LexiconModel, extract_date_entities};
pub use resolver::resolve_retirement_date;
