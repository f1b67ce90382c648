//! Core engine: fans the per-ticker pipeline out over the universe.

pub mod scanner;
