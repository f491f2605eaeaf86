//! Round trips between `.GR` archives and BMP files for `uw2gr-rs`

mod export;
mod fixtures;
mod rebuild;
