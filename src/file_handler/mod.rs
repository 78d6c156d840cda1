//! File handler module for Note Preview
//!
//! Handles all file system operations including:
//! - Reading note files with encoding detection
//! - Atomic writes for generated pages and saved notes
//! - Best-effort recursive copies for bundle assets

pub mod copy;
pub mod io;

pub use copy::*;
pub use io::*;
