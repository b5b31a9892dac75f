//! Root chain side processing of exit claims.
//!
//! An exit is honored at most once. A claim names a checkpoint block, the exit event and its
//! inclusion proof; it is accepted only if an admitted checkpoint covers the block, the proof
//! verifies against that checkpoint's event root, and the exit id was never processed before.

mod error;
mod processor;
mod registry;


pub use error::*;
pub use processor::*;
pub use registry::*;
