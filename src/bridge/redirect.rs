//! Where search diagnostics (`info` lines) go, and scoped redirection of it.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for the engine's diagnostic output.
#[derive(Clone, Default)]
pub enum DiagnosticStream {
    /// The process's standard output.
    #[default]
    Stdout,
    /// Discard everything.
    Sink,
    /// Append into a shared buffer.
    Capture(Arc<Mutex<Vec<u8>>>),
}

impl DiagnosticStream {
    /// A capturing stream and the handle to read what it collects.
    #[must_use]
    pub fn capture() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        (DiagnosticStream::Capture(Arc::clone(&buffer)), buffer)
    }
}

impl std::fmt::Debug for DiagnosticStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticStream::Stdout => f.write_str("Stdout"),
            DiagnosticStream::Sink => f.write_str("Sink"),
            DiagnosticStream::Capture(_) => f.write_str("Capture"),
        }
    }
}

impl Write for DiagnosticStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DiagnosticStream::Stdout => io::stdout().lock().write(buf),
            DiagnosticStream::Sink => Ok(buf.len()),
            DiagnosticStream::Capture(buffer) => {
                buffer.lock().extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DiagnosticStream::Stdout => io::stdout().flush(),
            _ => Ok(()),
        }
    }
}

/// Swaps a stream for a replacement and puts the original back on drop,
/// whichever way the scope is left.
pub struct RedirectGuard<'a> {
    slot: &'a mut DiagnosticStream,
    saved: Option<DiagnosticStream>,
}

impl<'a> RedirectGuard<'a> {
    pub fn new(slot: &'a mut DiagnosticStream, replacement: DiagnosticStream) -> Self {
        let saved = std::mem::replace(slot, replacement);
        RedirectGuard {
            slot,
            saved: Some(saved),
        }
    }
}

impl Deref for RedirectGuard<'_> {
    type Target = DiagnosticStream;

    fn deref(&self) -> &DiagnosticStream {
        &*self.slot
    }
}

impl DerefMut for RedirectGuard<'_> {
    fn deref_mut(&mut self) -> &mut DiagnosticStream {
        &mut *self.slot
    }
}

impl Drop for RedirectGuard<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.slot = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_collects_writes() {
        let (mut stream, buffer) = DiagnosticStream::capture();
        writeln!(stream, "info depth 1").unwrap();
        assert_eq!(&*buffer.lock(), b"info depth 1\n");
    }

    #[test]
    fn guard_restores_on_drop() {
        let (mut stream, buffer) = DiagnosticStream::capture();
        {
            let mut guard = RedirectGuard::new(&mut stream, DiagnosticStream::Sink);
            writeln!(guard, "silenced").unwrap();
            assert!(matches!(*guard, DiagnosticStream::Sink));
        }
        writeln!(stream, "heard").unwrap();
        assert_eq!(&*buffer.lock(), b"heard\n");
    }

    #[test]
    fn guard_restores_during_unwind() {
        let (mut stream, buffer) = DiagnosticStream::capture();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RedirectGuard::new(&mut stream, DiagnosticStream::Sink);
            panic!("search blew up");
        }));
        assert!(result.is_err());
        writeln!(stream, "back").unwrap();
        assert_eq!(&*buffer.lock(), b"back\n");
    }
}
