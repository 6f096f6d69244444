//! Integration test crate for Segline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple segline crates to verify they work together.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod editor;

#[cfg(test)]
mod playback;

#[cfg(test)]
mod export;

#[cfg(test)]
mod audio;
