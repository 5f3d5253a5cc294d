//! Text-input processing.
//!
//! Turns the human-friendly `name,friend` relationship file into the frozen
//! compact pair (dictionary + graph). The working set here is deliberately
//! non-compact: a hash map of members with hash sets of friends, easy to
//! mutate while lines stream by, thrown away once `compact()` has produced
//! the structures every later run actually uses.

mod collection;

pub use collection::*;
