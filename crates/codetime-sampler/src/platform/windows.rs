//! Windows focused-window query

use super::Result;
use codetime_core::{ProcessInfo, WindowBounds, WindowSnapshot};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::Path;
use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, RECT};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowRect, GetWindowTextW, GetWindowThreadProcessId,
};

pub fn active_window() -> Result<Option<WindowSnapshot>> {
    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.0 == 0 {
            return Ok(None);
        }

        let mut title_buf = [0u16; 512];
        let len = GetWindowTextW(hwnd, &mut title_buf);
        let title = if len > 0 {
            Some(
                OsString::from_wide(&title_buf[..len as usize])
                    .to_string_lossy()
                    .into_owned(),
            )
        } else {
            None
        };

        let mut rect = RECT::default();
        let position = GetWindowRect(hwnd, &mut rect).ok().map(|_| WindowBounds {
            x: rect.left,
            y: rect.top,
            width: rect.right - rect.left,
            height: rect.bottom - rect.top,
        });

        let mut process_id = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut process_id));

        let process = if process_id != 0 {
            let path = process_image_path(process_id);
            let exec_name = path.as_ref().and_then(|p| {
                Path::new(p)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            });
            // Display name is the executable stem ("Code" from "Code.exe").
            let name = exec_name
                .as_ref()
                .map(|n| n.trim_end_matches(".exe").to_string());
            Some(ProcessInfo {
                process_id: Some(process_id),
                name,
                exec_name,
                path,
            })
        } else {
            None
        };

        Ok(Some(WindowSnapshot {
            window_id: Some(hwnd.0 as u32),
            title,
            position,
            process,
        }))
    }
}

fn process_image_path(process_id: u32) -> Option<String> {
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id).ok()?;

        let mut buf = [0u16; 1024];
        let mut len = buf.len() as u32;
        let queried =
            QueryFullProcessImageNameW(handle, PROCESS_NAME_WIN32, PWSTR(buf.as_mut_ptr()), &mut len);
        let _ = CloseHandle(handle);
        queried.ok()?;

        Some(
            OsString::from_wide(&buf[..len as usize])
                .to_string_lossy()
                .into_owned(),
        )
    }
}
