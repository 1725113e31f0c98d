// src/processing/mod.rs
//! Signal processing pipeline for EMG recordings

pub mod features;
pub mod filter_bank;
pub mod filters;
pub mod phasic;
pub mod pipeline;
pub mod spectrum;
pub mod windowing;

pub use features::*;
pub use filter_bank::*;
pub use phasic::*;
pub use pipeline::*;
pub use spectrum::*;
pub use windowing::*;
