//! The decoding pipeline, stage by stage:
//! - **acquire**: turn encoded bytes into a validated pixel buffer
//! - **preprocess**: generate deterministic grayscale candidates
//! - **chain**: run decoder engines in fixed priority order
//! - **scanner**: orchestrate single and dual (Serial/PIP) scans

pub mod acquire;
pub mod chain;
pub mod preprocess;
pub mod scanner;

// Re-exports for convenient access
pub use acquire::{ImageAcquirer, RawImage};
pub use chain::{ChainHit, DecoderChain};
pub use preprocess::{Candidate, InputProfile, Preprocessor};
pub use scanner::ScanPipeline;
