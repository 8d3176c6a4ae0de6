//! Cross-platform focused-window sampling for Codetime
//!
//! A single synchronous query, `active_window`, answers "what window is
//! focused right now" with whatever identity the platform can provide.

pub mod platform;

pub use platform::{active_window, Result, SamplerError};
