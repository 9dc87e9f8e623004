use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use janggi_bridge::board::Board;

#[test]
fn console_driver_answers_like_the_host_surface() {
    let exe = env!("CARGO_BIN_EXE_janggi_bridge");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn console driver");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let mut reader = BufReader::new(stdout);

    stdin
        .write_all(b"uci\nisready\nposition startpos moves b0c2\ngo depth 3\n")
        .unwrap();

    let mut output = String::new();
    let mut bestmove_line = None;
    loop {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).expect("read failed");
        if bytes == 0 {
            break;
        }
        output.push_str(&line);
        if line.starts_with("bestmove") {
            bestmove_line = Some(line);
            break;
        }
    }

    stdin
        .write_all(b"analyze 2 4k4/8R/9/9/9/9/9/9/9/R2K5 w - - 0 1\nquit\n")
        .unwrap();
    let mut rest = String::new();
    for line in reader.lines() {
        rest.push_str(&line.unwrap());
        rest.push('\n');
    }
    let status = child.wait().unwrap();
    assert!(status.success());

    assert!(output.contains("uciok"));
    assert!(output.contains("readyok"));
    assert!(output.contains("info depth 3 "), "{output}");

    let bestmove = bestmove_line.expect("no bestmove found");
    let mv = bestmove.split_whitespace().nth(1).expect("bestmove missing move");
    let mut board = Board::new();
    board.make_move_str("b0c2").unwrap();
    assert!(board.parse_move(mv).is_ok(), "illegal reply {mv}");

    assert!(rest.contains("mate 1 bestmove a0a9\n"), "{rest}");
    assert!(rest.ends_with("ok\n"), "{rest}");
}
