//! Query-parameter translation
//!
//! Pure functions that turn the optional query parameters of a request
//! into storage-layer filter documents, plus the date-window helpers the
//! expense and project-details queries share.
//!
//! Ground rules (uniform across entities):
//!
//! - no parameters means the empty filter, matching everything
//! - recognized keys are extracted individually; unrecognized keys are
//!   silently ignored
//! - a recognized key with a malformed value fails the whole operation
//!   with an invalid-argument error, never a silently dropped filter

pub mod filter;
pub mod window;

pub use window::DateWindow;

/// Errors from translating query parameters into filters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A boolean-typed parameter did not parse as `true`/`false`.
    #[error("invalid boolean `{value}` for `{key}`")]
    InvalidBool { key: String, value: String },

    /// A date-typed parameter did not match the `YYYY-MM-DD` layout.
    #[error("invalid date `{value}` for `{key}`, expected YYYY-MM-DD")]
    InvalidDate { key: String, value: String },

    /// A date range was requested with one of its bounds missing.
    #[error("date range requires both `start` and `end`, missing `{0}`")]
    MissingBound(&'static str),
}
