//! macOS focused-window query using Cocoa/AppKit
//!
//! NSWorkspace only exposes the frontmost application, not its windows,
//! so the snapshot carries process identity and leaves the window fields
//! unset.

use super::{Result, SamplerError};
use cocoa::base::{id, nil};
use codetime_core::{ProcessInfo, WindowSnapshot};
use objc::{class, msg_send, sel, sel_impl};
use std::path::Path;

pub fn active_window() -> Result<Option<WindowSnapshot>> {
    unsafe {
        let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
        if workspace == nil {
            return Err(SamplerError::Query(
                "failed to get shared workspace".to_string(),
            ));
        }

        let frontmost: id = msg_send![workspace, frontmostApplication];
        if frontmost == nil {
            return Ok(None);
        }

        let pid: i32 = msg_send![frontmost, processIdentifier];

        let name: id = msg_send![frontmost, localizedName];
        let name = if name != nil {
            Some(nsstring_to_string(name))
        } else {
            None
        };

        let exec_url: id = msg_send![frontmost, executableURL];
        let exec_path = url_path(exec_url);
        let exec_name = exec_path.as_ref().and_then(|p| {
            Path::new(p)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        });

        // Prefer the bundle path ("…/Visual Studio Code.app") so path
        // matching sees the bundle segment.
        let bundle_url: id = msg_send![frontmost, bundleURL];
        let path = url_path(bundle_url).or(exec_path);

        Ok(Some(WindowSnapshot {
            window_id: None,
            title: None,
            position: None,
            process: Some(ProcessInfo {
                process_id: (pid >= 0).then(|| pid as u32),
                name,
                exec_name,
                path,
            }),
        }))
    }
}

unsafe fn url_path(url: id) -> Option<String> {
    if url == nil {
        return None;
    }
    let path: id = msg_send![url, path];
    if path == nil {
        return None;
    }
    Some(nsstring_to_string(path))
}

unsafe fn nsstring_to_string(nsstring: id) -> String {
    let bytes: *const std::os::raw::c_char = msg_send![nsstring, UTF8String];
    if bytes.is_null() {
        return String::new();
    }
    std::ffi::CStr::from_ptr(bytes)
        .to_string_lossy()
        .into_owned()
}
