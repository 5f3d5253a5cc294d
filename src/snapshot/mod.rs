//! File-level snapshot framing.
//!
//! A snapshot concatenates the dictionary and graph compact forms behind a
//! 20-byte header, so a later run gets the whole frozen network back with
//! one open, one map, and two linear parses, with no text processing at all.

mod file;

pub use file::*;
