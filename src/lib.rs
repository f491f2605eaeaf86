#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `uw2gr-rs` extracts the bitmaps of the `.GR` archives of an old game to
//! 8-bit BMP files and rebuilds the archives from edited bitmaps.
//!
//! The codecs live in [`uw2gr_types`]; this crate re-exports them and hosts
//! the `gr_utils` command-line tool.

pub use uw2gr_types::*;
