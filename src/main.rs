//! Console driver for the bridge: reads command lines from stdin and prints
//! each reply, the way a host calling the C surface would see it.
//!
//! Besides the bridge commands it understands `analyze <depth> <fen>`.
//! Set `RUST_LOG=debug` to watch the session's trace.

use std::io::{self, BufRead, Write};

use janggi_bridge::bridge::{InitStatus, Session};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut session = Session::new();
    if let InitStatus::Failed(reason) = session.initialize() {
        eprintln!("{reason}");
        std::process::exit(1);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let reply = match line.split_once(char::is_whitespace) {
            Some(("analyze", rest)) => {
                let (depth, fen) = rest.trim().split_once(char::is_whitespace).unwrap_or((rest, ""));
                match depth.parse::<i32>() {
                    Ok(depth) => session.analyze(Some(fen.trim()), depth),
                    Err(_) => {
                        eprintln!("usage: analyze <depth> <fen>");
                        continue;
                    }
                }
            }
            _ => session.execute(Some(&line)),
        };

        write!(stdout, "{reply}")?;
        if !reply.is_empty() && !reply.ends_with('\n') {
            writeln!(stdout)?;
        }
        stdout.flush()?;

        if line.trim() == "quit" {
            break;
        }
    }

    session.shutdown();
    Ok(())
}
