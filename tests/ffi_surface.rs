use std::ffi::{CStr, CString};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use serial_test::serial;

use janggi_bridge::bridge::{ffi, DiagnosticStream};
use janggi_bridge::{stockfish_analyze, stockfish_cleanup, stockfish_command, stockfish_init};

fn command(cmd: &str) -> String {
    let cmd = CString::new(cmd).unwrap();
    unsafe { CStr::from_ptr(stockfish_command(cmd.as_ptr())) }
        .to_string_lossy()
        .into_owned()
}

fn analyze(fen: &str, depth: i32) -> String {
    let fen = CString::new(fen).unwrap();
    unsafe { CStr::from_ptr(stockfish_analyze(fen.as_ptr(), depth)) }
        .to_string_lossy()
        .into_owned()
}

fn fresh_engine() {
    stockfish_cleanup();
    stockfish_init();
    ffi::session().redirect_diagnostics(DiagnosticStream::Sink);
}

#[test]
#[serial]
fn calls_before_init_report_not_initialized() {
    stockfish_cleanup();
    assert_eq!(command("isready"), "error: Engine not initialized");
    assert_eq!(analyze("4k4/9/9/9/9/9/9/9/9/4K4 w", 1), "error: Engine not initialized");
    // Cleanup of an uninitialized engine is harmless
    stockfish_cleanup();
}

#[test]
#[serial]
fn host_smoke_sequence() {
    fresh_engine();
    stockfish_init();

    assert!(command("uci").ends_with("uciok\n"));
    assert_eq!(command("isready"), "readyok\n");
    assert_eq!(command("position startpos"), "ok\n");
    assert!(command("go depth 3").starts_with("bestmove "));
    assert_eq!(command("ucinewgame"), "ok\n");
    assert_eq!(command("position startpos moves b0c2 b9c7"), "ok\n");
    assert!(command("go depth 3").starts_with("bestmove "));
    assert_eq!(command("invalid_command"), "Unknown command: invalid_command\n");
    stockfish_cleanup();
}

#[test]
#[serial]
fn null_pointers_are_rejected() {
    fresh_engine();
    let reply = unsafe { CStr::from_ptr(stockfish_command(std::ptr::null())) };
    assert_eq!(reply.to_str().unwrap(), "error: Null command");
    let reply = unsafe { CStr::from_ptr(stockfish_analyze(std::ptr::null(), 4)) };
    assert_eq!(reply.to_str().unwrap(), "error: Null FEN");
    stockfish_cleanup();
}

#[test]
#[serial]
fn analyze_through_c_surface() {
    fresh_engine();
    assert_eq!(
        analyze("4k4/8R/9/9/9/9/9/9/9/R2K5 w - - 0 1", 2),
        "mate 1 bestmove a0a9"
    );
    stockfish_cleanup();
    assert_eq!(
        analyze("4k4/8R/9/9/9/9/9/9/9/R2K5 w - - 0 1", 2),
        "error: Engine not initialized"
    );
}

#[test]
#[serial]
fn reply_pointer_is_the_shared_buffer() {
    fresh_engine();
    let isready = CString::new("isready").unwrap();
    let uci = CString::new("uci").unwrap();
    let first = unsafe { stockfish_command(isready.as_ptr()) };
    let second = unsafe { stockfish_command(uci.as_ptr()) };
    assert_eq!(first, second);
    // The earlier pointer now reads the newer reply
    let text = unsafe { CStr::from_ptr(first) }.to_str().unwrap();
    assert!(text.ends_with("uciok\n"));
    stockfish_cleanup();
}

#[test]
#[serial]
fn concurrent_callers_are_serialized() {
    fresh_engine();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let mv = if i % 2 == 0 { "b0c2" } else { "h0g2" };
                (0..5)
                    .map(|_| {
                        // One lock across position + go so no caller sees another's game
                        let mut session = ffi::session();
                        session.execute(Some(&format!("position startpos moves {mv}")));
                        let fen = session.state().fen();
                        let reply = session.execute(Some("go depth 1")).to_string();
                        (fen, reply)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let mv = if i % 2 == 0 { "b0c2" } else { "h0g2" };
        let mut expected = janggi_bridge::Board::new();
        expected.make_move_str(mv).unwrap();
        for (fen, reply) in handle.join().unwrap() {
            assert_eq!(fen, expected.to_fen());
            assert!(reply.starts_with("bestmove "), "{reply:?}");
        }
    }

    stockfish_cleanup();
}

#[test]
#[serial]
fn concurrent_submits_through_c_surface() {
    fresh_engine();
    let uci_reply = command("uci");
    let ready_reply = command("isready");

    const THREADS: usize = 8;
    let start = Arc::new(Barrier::new(THREADS));
    // Second phase: each call and the copy of its reply happen together
    let reading = Arc::new(Mutex::new(()));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let start = Arc::clone(&start);
            let reading = Arc::clone(&reading);
            thread::spawn(move || {
                let cmd = CString::new(if i % 2 == 0 { "uci" } else { "isready" }).unwrap();
                start.wait();
                // Simultaneous calls; nobody reads the shared buffer yet
                for _ in 0..20 {
                    unsafe { stockfish_command(cmd.as_ptr()) };
                }
                start.wait();
                (0..20)
                    .map(|_| {
                        let _read = reading.lock().unwrap();
                        let reply = unsafe { CStr::from_ptr(stockfish_command(cmd.as_ptr())) };
                        reply.to_string_lossy().into_owned()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for reply in handle.join().unwrap() {
            assert!(reply == uci_reply || reply == ready_reply, "torn reply {reply:?}");
        }
    }
    stockfish_cleanup();
}
