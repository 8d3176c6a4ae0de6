//! Linux focused-window query using X11

use super::{Result, SamplerError};
use codetime_core::{ProcessInfo, WindowBounds, WindowSnapshot};
use std::path::Path;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt, GetPropertyReply, Window};
use x11rb::rust_connection::RustConnection;

pub fn active_window() -> Result<Option<WindowSnapshot>> {
    let (conn, screen_num) = RustConnection::connect(None)
        .map_err(|e| SamplerError::Query(format!("X11 connection failed: {}", e)))?;
    let root = conn.setup().roots[screen_num].root;

    let net_active_window = atom(&conn, b"_NET_ACTIVE_WINDOW")?;
    let active_reply = property(&conn, root, net_active_window, AtomEnum::WINDOW.into(), 1)?;
    let window = match u32_from_reply(&active_reply) {
        Some(window) => window,
        None => return Ok(None),
    };

    let net_wm_name = atom(&conn, b"_NET_WM_NAME")?;
    let utf8_string = atom(&conn, b"UTF8_STRING")?;
    let title_reply = property(&conn, window, net_wm_name, utf8_string, 1024)?;
    let title = if title_reply.value.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&title_reply.value).into_owned())
    };

    // WM_CLASS carries two null-terminated strings: instance and class.
    // The class name is the closest thing X11 has to a display name.
    let wm_class = atom(&conn, b"WM_CLASS")?;
    let class_reply = property(&conn, window, wm_class, AtomEnum::STRING.into(), 1024)?;
    let name = {
        let raw = String::from_utf8_lossy(&class_reply.value);
        raw.split('\0')
            .nth(1)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    };

    let net_wm_pid = atom(&conn, b"_NET_WM_PID")?;
    let pid_reply = property(&conn, window, net_wm_pid, AtomEnum::CARDINAL.into(), 1)?;
    let pid = u32_from_reply(&pid_reply);

    let exe = pid.and_then(|p| std::fs::read_link(format!("/proc/{}/exe", p)).ok());
    let path = exe.as_ref().map(|p| p.to_string_lossy().into_owned());
    let exec_name = exe.as_ref().and_then(|p| {
        Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    });

    let position = conn
        .get_geometry(window)
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .map(|geometry| WindowBounds {
            x: geometry.x as i32,
            y: geometry.y as i32,
            width: geometry.width as i32,
            height: geometry.height as i32,
        });

    let process = if pid.is_some() || name.is_some() || exec_name.is_some() {
        Some(ProcessInfo {
            process_id: pid,
            name,
            exec_name,
            path,
        })
    } else {
        None
    };

    Ok(Some(WindowSnapshot {
        window_id: Some(window),
        title,
        position,
        process,
    }))
}

fn atom(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    Ok(conn
        .intern_atom(false, name)
        .map_err(|e| SamplerError::Query(format!("failed to intern atom: {}", e)))?
        .reply()
        .map_err(|e| SamplerError::Query(format!("failed to get atom reply: {}", e)))?
        .atom)
}

fn property(
    conn: &RustConnection,
    window: Window,
    property: Atom,
    ty: Atom,
    length: u32,
) -> Result<GetPropertyReply> {
    conn.get_property(false, window, property, ty, 0, length)
        .map_err(|e| SamplerError::Query(format!("failed to get property: {}", e)))?
        .reply()
        .map_err(|e| SamplerError::Query(format!("failed to get property reply: {}", e)))
}

/// Reads a 32-bit value from a property reply; `None` when absent or zero.
fn u32_from_reply(reply: &GetPropertyReply) -> Option<u32> {
    if reply.value.len() < 4 {
        return None;
    }
    let value = u32::from_ne_bytes([
        reply.value[0],
        reply.value[1],
        reply.value[2],
        reply.value[3],
    ]);
    (value != 0).then_some(value)
}
