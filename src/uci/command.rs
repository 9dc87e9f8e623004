//! Tokenizing of bridge command lines.

use crate::engine::SearchLimits;

/// How a `position` command sets up the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSetup {
    StartPos,
    Fen(String),
    Sfen(String),
    /// Missing or unknown sub-keyword; the position is left alone.
    Unrecognised,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionCommand {
    pub setup: PositionSetup,
    pub moves: Vec<String>,
}

/// A parsed `go`; search moves stay textual until resolved on the board.
#[derive(Debug, Clone)]
pub struct GoCommand {
    pub limits: SearchLimits,
    pub searchmoves: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(PositionCommand),
    Go(GoCommand),
    SetOption { name: String, value: String },
    Quit,
    Empty,
    Unknown(String),
}

/// Split a command line on whitespace and select the handler by its first token.
#[must_use]
pub fn parse_uci_command(line: &str) -> UciCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, rest)) = parts.split_first() else {
        return UciCommand::Empty;
    };

    match head {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(parse_position(rest)),
        "go" => UciCommand::Go(parse_go(rest)),
        "setoption" => {
            let (name, value) = parse_setoption(rest);
            UciCommand::SetOption { name, value }
        }
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(line.to_string()),
    }
}

/// `startpos` swallows exactly one following token (normally `moves`);
/// `fen`/`sfen` collect the FEN up to the `moves` keyword.
fn parse_position(args: &[&str]) -> PositionCommand {
    let owned = |tokens: &[&str]| tokens.iter().map(|t| (*t).to_string()).collect::<Vec<_>>();

    match args.split_first() {
        Some((&"startpos", rest)) => PositionCommand {
            setup: PositionSetup::StartPos,
            moves: owned(rest.get(1..).unwrap_or(&[])),
        },
        Some((&keyword @ ("fen" | "sfen"), rest)) => {
            let split = rest.iter().position(|&t| t == "moves");
            let (fen, moves) = match split {
                Some(i) => (&rest[..i], &rest[i + 1..]),
                None => (rest, &[][..]),
            };
            let fen = fen.join(" ");
            let setup = if keyword == "fen" {
                PositionSetup::Fen(fen)
            } else {
                PositionSetup::Sfen(fen)
            };
            PositionCommand {
                setup,
                moves: owned(moves),
            }
        }
        _ => PositionCommand {
            setup: PositionSetup::Unrecognised,
            moves: Vec::new(),
        },
    }
}

/// Parse `go` arguments. A numeric argument that does not parse ends the
/// argument list, like a failed stream extraction would.
fn parse_go(args: &[&str]) -> GoCommand {
    let mut limits = SearchLimits::default();
    let mut searchmoves = Vec::new();
    let mut iter = args.iter();

    while let Some(&token) = iter.next() {
        let parsed = match token {
            "searchmoves" => {
                searchmoves.extend(iter.by_ref().map(|t| (*t).to_string()));
                true
            }
            "infinite" => {
                limits.infinite = true;
                true
            }
            "wtime" => next_number(&mut iter).map(|v| limits.time[0] = Some(v.max(0) as u64)).is_some(),
            "btime" => next_number(&mut iter).map(|v| limits.time[1] = Some(v.max(0) as u64)).is_some(),
            "winc" => next_number(&mut iter).map(|v| limits.inc[0] = v.max(0) as u64).is_some(),
            "binc" => next_number(&mut iter).map(|v| limits.inc[1] = v.max(0) as u64).is_some(),
            "movestogo" => next_number(&mut iter)
                .map(|v| limits.movestogo = (v > 0).then_some(v as u64))
                .is_some(),
            "depth" => next_number(&mut iter)
                .map(|v| limits.depth = (v > 0).then(|| v.min(i64::from(u32::MAX)) as u32))
                .is_some(),
            "nodes" => next_number(&mut iter)
                .map(|v| limits.nodes = (v > 0).then_some(v as u64))
                .is_some(),
            "movetime" => next_number(&mut iter)
                .map(|v| limits.movetime = (v > 0).then_some(v as u64))
                .is_some(),
            _ => true,
        };
        if !parsed {
            break;
        }
    }

    GoCommand {
        limits,
        searchmoves,
    }
}

fn next_number(iter: &mut std::slice::Iter<'_, &str>) -> Option<i64> {
    iter.next()?.parse().ok()
}

/// `name <words...> value <words...>`, each side joined by single spaces.
fn parse_setoption(args: &[&str]) -> (String, String) {
    let args = match args.split_first() {
        Some((&"name", rest)) => rest,
        Some((_, rest)) => rest,
        None => args,
    };
    let split = args.iter().position(|&t| t == "value");
    let (name, value) = match split {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[][..]),
    };
    (name.join(" "), value.join(" "))
}
