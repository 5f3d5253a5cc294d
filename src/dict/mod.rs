//! Member name dictionary.
//!
//! Maps names to dense `u32` indices and back. The forward direction is a
//! hash map, the inverse is plain vector indexing; the compact byte form is
//! laid out in index order precisely so that loading repopulates both sides
//! in one linear pass.

mod name_dict;

pub use name_dict::*;
