//! Rank crops by how well soil and weather readings fit their ideal ranges.
//!
//! The core is [`scoring::Scorer`]: build it once from a validated
//! [`catalog::Catalog`], then call [`scoring::Scorer::rank`] with a
//! [`scoring::UserInput`]. The [`simulate`] module holds the seeded demo
//! generators (stock price walks and EMG signals).

pub mod catalog;
pub mod config;
pub mod output;
pub mod scoring;
pub mod simulate;
