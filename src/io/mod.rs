// src/io/mod.rs
//! File I/O for device recordings

pub mod wav;

pub use wav::read_wav;
