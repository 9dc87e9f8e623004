//! Exported C functions over one process-wide [`Session`].
//!
//! Every call takes the session lock for its whole duration, so callers on
//! different threads are served one at a time. Returned pointers refer to
//! the session's reply buffer and stay valid until the next call.

use std::borrow::Cow;
use std::ffi::{c_char, c_int, CStr};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};

use super::Session;

static SESSION: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::new()));

/// Lock the process-wide session for Rust callers sharing it with the C surface.
pub fn session() -> MutexGuard<'static, Session> {
    SESSION.lock()
}

/// Borrow a host string; a null pointer reads as `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays alive
/// for the duration of the call.
unsafe fn host_str<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy())
    }
}

#[no_mangle]
pub extern "C" fn stockfish_init() {
    let status = session().initialize();
    log::debug!("stockfish_init: {status:?}");
}

/// Run one command line.
///
/// # Safety
/// `cmd` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn stockfish_command(cmd: *const c_char) -> *const c_char {
    let command = host_str(cmd);
    let mut session = session();
    session.execute(command.as_deref());
    session.output().as_ptr()
}

/// Analyse a FEN to a fixed depth.
///
/// # Safety
/// `fen` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn stockfish_analyze(fen: *const c_char, depth: c_int) -> *const c_char {
    let fen = host_str(fen);
    let mut session = session();
    session.analyze(fen.as_deref(), depth);
    session.output().as_ptr()
}

#[no_mangle]
pub extern "C" fn stockfish_cleanup() {
    session().shutdown();
}
