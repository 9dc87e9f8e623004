//! Precomputed board geometry: palaces, palace diagonals and leaper tables.
//!
//! Horse and elephant moves are stored together with the intermediate
//! points that must be empty, so both generation and reverse attack lookup
//! are plain table walks.

#![allow(clippy::needless_range_loop)]

use once_cell::sync::Lazy;

use super::types::{Color, Square, NUM_SQUARES};

pub(crate) const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(crate) const DIAGONAL: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// One horse step: the orthogonal leg that must be empty, then the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HorseStep {
    pub(crate) leg: Square,
    pub(crate) target: Square,
}

/// One elephant step: two legs that must be empty, then the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ElephantStep {
    pub(crate) legs: [Square; 2],
    pub(crate) target: Square,
}

/// A precomputed move seen from the destination: where the mover stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Source<T> {
    pub(crate) origin: Square,
    pub(crate) step: T,
}

/// Owner of the palace each point belongs to.
static PALACE: Lazy<[Option<Color>; NUM_SQUARES]> = Lazy::new(|| {
    let mut palace = [None; NUM_SQUARES];
    for sq in Square::all() {
        let (file, rank) = (sq.file(), sq.rank());
        if (3..=5).contains(&file) {
            palace[sq.index()] = match rank {
                0..=2 => Some(Color::White),
                7..=9 => Some(Color::Black),
                _ => None,
            };
        }
    }
    palace
});

/// Palace diagonal neighbour in each `DIAGONAL` direction.
///
/// Diagonal lines join the four corners of a palace through its centre, so a
/// step exists only when both points share a palace and one of them is the
/// centre.
static PALACE_DIAG: Lazy<[[Option<Square>; 4]; NUM_SQUARES]> = Lazy::new(|| {
    let mut table = [[None; 4]; NUM_SQUARES];
    for sq in Square::all() {
        let Some(owner) = palace_of(sq) else {
            continue;
        };
        for (dir, &(df, dr)) in DIAGONAL.iter().enumerate() {
            let Some(to) = sq.offset(df, dr) else {
                continue;
            };
            if palace_of(to) == Some(owner) && (is_palace_centre(sq) || is_palace_centre(to)) {
                table[sq.index()][dir] = Some(to);
            }
        }
    }
    table
});

/// General and advisor destinations: one step along palace lines.
static PALACE_MOVES: Lazy<Vec<Vec<Square>>> = Lazy::new(|| {
    Square::all()
        .map(|sq| {
            let Some(owner) = palace_of(sq) else {
                return Vec::new();
            };
            let mut moves: Vec<Square> = ORTHOGONAL
                .iter()
                .filter_map(|&(df, dr)| sq.offset(df, dr))
                .filter(|&to| palace_of(to) == Some(owner))
                .collect();
            moves.extend((0..4).filter_map(|dir| palace_diag_step(sq, dir)));
            moves
        })
        .collect()
});

static HORSE_MOVES: Lazy<Vec<Vec<HorseStep>>> = Lazy::new(|| {
    Square::all()
        .map(|sq| {
            let mut steps = Vec::with_capacity(8);
            for &(of, or) in &ORTHOGONAL {
                let Some(leg) = sq.offset(of, or) else {
                    continue;
                };
                for (df, dr) in outward_diagonals(of, or) {
                    if let Some(target) = leg.offset(df, dr) {
                        steps.push(HorseStep { leg, target });
                    }
                }
            }
            steps
        })
        .collect()
});

static ELEPHANT_MOVES: Lazy<Vec<Vec<ElephantStep>>> = Lazy::new(|| {
    Square::all()
        .map(|sq| {
            let mut steps = Vec::with_capacity(8);
            for &(of, or) in &ORTHOGONAL {
                let Some(first) = sq.offset(of, or) else {
                    continue;
                };
                for (df, dr) in outward_diagonals(of, or) {
                    let Some(second) = first.offset(df, dr) else {
                        continue;
                    };
                    if let Some(target) = second.offset(df, dr) {
                        steps.push(ElephantStep {
                            legs: [first, second],
                            target,
                        });
                    }
                }
            }
            steps
        })
        .collect()
});

/// Soldier destinations per color: forward, sideways, and forward palace
/// diagonals inside the enemy palace.
static SOLDIER_MOVES: Lazy<[Vec<Vec<Square>>; 2]> = Lazy::new(|| {
    [Color::White, Color::Black].map(|color| {
        Square::all()
            .map(|sq| {
                let fwd = color.forward();
                let mut moves: Vec<Square> = [(0, fwd), (-1, 0), (1, 0)]
                    .iter()
                    .filter_map(|&(df, dr)| sq.offset(df, dr))
                    .collect();
                if palace_of(sq) == Some(color.opposite()) {
                    for (dir, &(_, dr)) in DIAGONAL.iter().enumerate() {
                        if dr == fwd {
                            moves.extend(palace_diag_step(sq, dir));
                        }
                    }
                }
                moves
            })
            .collect()
    })
});

static HORSE_SOURCES: Lazy<Vec<Vec<Source<HorseStep>>>> = Lazy::new(|| {
    let mut sources = vec![Vec::new(); NUM_SQUARES];
    for origin in Square::all() {
        for &step in &HORSE_MOVES[origin.index()] {
            sources[step.target.index()].push(Source { origin, step });
        }
    }
    sources
});

static ELEPHANT_SOURCES: Lazy<Vec<Vec<Source<ElephantStep>>>> = Lazy::new(|| {
    let mut sources = vec![Vec::new(); NUM_SQUARES];
    for origin in Square::all() {
        for &step in &ELEPHANT_MOVES[origin.index()] {
            sources[step.target.index()].push(Source { origin, step });
        }
    }
    sources
});

static SOLDIER_SOURCES: Lazy<[Vec<Vec<Square>>; 2]> = Lazy::new(|| {
    [Color::White, Color::Black].map(|color| {
        let mut sources = vec![Vec::new(); NUM_SQUARES];
        for origin in Square::all() {
            for &to in &SOLDIER_MOVES[color.index()][origin.index()] {
                sources[to.index()].push(origin);
            }
        }
        sources
    })
});

/// The two diagonals continuing away from an orthogonal step.
fn outward_diagonals(of: i32, or: i32) -> [(i32, i32); 2] {
    if of == 0 {
        [(-1, or), (1, or)]
    } else {
        [(of, -1), (of, 1)]
    }
}

#[inline]
pub(crate) fn palace_of(sq: Square) -> Option<Color> {
    PALACE[sq.index()]
}

#[inline]
pub(crate) fn is_palace_centre(sq: Square) -> bool {
    sq.file() == 4 && (sq.rank() == 1 || sq.rank() == 8)
}

/// Diagonal palace step from `sq` in `DIAGONAL[dir]`, if that line exists.
#[inline]
pub(crate) fn palace_diag_step(sq: Square, dir: usize) -> Option<Square> {
    PALACE_DIAG[sq.index()][dir]
}

#[inline]
pub(crate) fn palace_moves(sq: Square) -> &'static [Square] {
    &PALACE_MOVES[sq.index()]
}

#[inline]
pub(crate) fn horse_moves(sq: Square) -> &'static [HorseStep] {
    &HORSE_MOVES[sq.index()]
}

#[inline]
pub(crate) fn elephant_moves(sq: Square) -> &'static [ElephantStep] {
    &ELEPHANT_MOVES[sq.index()]
}

#[inline]
pub(crate) fn soldier_moves(color: Color, sq: Square) -> &'static [Square] {
    &SOLDIER_MOVES[color.index()][sq.index()]
}

#[inline]
pub(crate) fn horse_sources(sq: Square) -> &'static [Source<HorseStep>] {
    &HORSE_SOURCES[sq.index()]
}

#[inline]
pub(crate) fn elephant_sources(sq: Square) -> &'static [Source<ElephantStep>] {
    &ELEPHANT_SOURCES[sq.index()]
}

/// Points from which a soldier of `color` reaches `sq`.
#[inline]
pub(crate) fn soldier_sources(color: Color, sq: Square) -> &'static [Square] {
    &SOLDIER_SOURCES[color.index()][sq.index()]
}

/// Build every geometry table. Safe to call repeatedly.
pub fn init() {
    Lazy::force(&PALACE);
    Lazy::force(&PALACE_DIAG);
    Lazy::force(&PALACE_MOVES);
    Lazy::force(&HORSE_MOVES);
    Lazy::force(&ELEPHANT_MOVES);
    Lazy::force(&SOLDIER_MOVES);
    Lazy::force(&HORSE_SOURCES);
    Lazy::force(&ELEPHANT_SOURCES);
    Lazy::force(&SOLDIER_SOURCES);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn palaces_cover_nine_points_each() {
        let white = Square::all()
            .filter(|&s| palace_of(s) == Some(Color::White))
            .count();
        let black = Square::all()
            .filter(|&s| palace_of(s) == Some(Color::Black))
            .count();
        assert_eq!((white, black), (9, 9));
        assert_eq!(palace_of(sq("e1")), Some(Color::White));
        assert_eq!(palace_of(sq("f9")), Some(Color::Black));
        assert_eq!(palace_of(sq("c1")), None);
    }

    #[test]
    fn palace_diagonals_pass_through_centre() {
        let centre_moves = palace_moves(sq("e1"));
        assert_eq!(centre_moves.len(), 8);
        let corner_moves = palace_moves(sq("d0"));
        assert!(corner_moves.contains(&sq("e1")));
        assert_eq!(corner_moves.len(), 3);
        // Edge midpoints have no diagonal lines
        assert_eq!(palace_moves(sq("e0")).len(), 3);
        assert_eq!(palace_moves(sq("e9")).len(), 3);
    }

    #[test]
    fn horse_and_elephant_patterns() {
        assert_eq!(horse_moves(sq("e4")).len(), 8);
        assert_eq!(horse_moves(sq("a0")).len(), 2);
        let b0: Vec<Square> = horse_moves(sq("b0")).iter().map(|s| s.target).collect();
        assert!(b0.contains(&sq("c2")));
        assert!(b0.contains(&sq("a2")));
        assert!(b0.contains(&sq("d1")));

        let c0: Vec<ElephantStep> = elephant_moves(sq("c0")).to_vec();
        let to_e3 = c0.iter().find(|s| s.target == sq("e3")).unwrap();
        assert_eq!(to_e3.legs, [sq("c1"), sq("d2")]);
    }

    #[test]
    fn soldiers_gain_diagonals_only_in_enemy_palace() {
        assert_eq!(soldier_moves(Color::White, sq("e3")).len(), 3);
        let in_palace = soldier_moves(Color::White, sq("d7"));
        assert!(in_palace.contains(&sq("e8")));
        assert!(!soldier_moves(Color::White, sq("e8")).contains(&sq("d7")));
        // Edge midpoint of the palace has no diagonal
        assert_eq!(soldier_moves(Color::White, sq("e7")).len(), 3);
        assert!(soldier_moves(Color::Black, sq("f2")).contains(&sq("e1")));
    }

    #[test]
    fn sources_mirror_moves() {
        for origin in Square::all() {
            for step in horse_moves(origin) {
                assert!(horse_sources(step.target)
                    .iter()
                    .any(|s| s.origin == origin && s.step == *step));
            }
        }
    }
}
