//! Error Types
//!
//! Two different failure shapes exist in this crate: constructor-time
//! failures that have a sensible `Result` to return ([`EmberError`], here),
//! and in-band misuse that must not unwind the scene tree (wrong node kind
//! on a typed accessor, removing an already-freed node, queue overflow) —
//! those are reported via `log::warn!`/`log::error!` at the call site
//! instead and the call becomes a no-op; see `Scene`'s methods.
//!
//! ```rust,ignore
//! use emberscene::errors::{EmberError, Result};
//!
//! fn load_image(header: &[u16]) -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The error type for scene construction and asset decoding.
#[derive(Error, Debug)]
pub enum EmberError {
    /// An image header failed to parse (truncated payload, bad dimensions).
    #[error("image format error: {0}")]
    ImageFormat(String),

    /// An image header's format tag isn't one of the three recognized formats.
    #[error("unknown image format tag: {0:#x}")]
    UnknownImageFormat(u16),
}

/// Alias for `Result<T, EmberError>`.
pub type Result<T> = std::result::Result<T, EmberError>;
