//! Platform-specific focused-window queries

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

use codetime_core::WindowSnapshot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Failed to query focused window: {0}")]
    Query(String),
    #[error("Unsupported platform")]
    Unsupported,
}

pub type Result<T> = std::result::Result<T, SamplerError>;

/// Returns the currently focused window, or `None` when no window holds
/// focus. Each call is a fresh, bounded, synchronous query.
#[cfg(target_os = "macos")]
pub fn active_window() -> Result<Option<WindowSnapshot>> {
    macos::active_window()
}

#[cfg(target_os = "windows")]
pub fn active_window() -> Result<Option<WindowSnapshot>> {
    windows::active_window()
}

#[cfg(target_os = "linux")]
pub fn active_window() -> Result<Option<WindowSnapshot>> {
    linux::active_window()
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
pub fn active_window() -> Result<Option<WindowSnapshot>> {
    Err(SamplerError::Unsupported)
}
