//! UCI option registry.
//!
//! Names are matched case-insensitively. Values that fail validation (spin
//! out of range, non-boolean check, unknown combo entry) are rejected and the
//! previous value is kept.

use thiserror::Error;

pub const THREADS: &str = "Threads";
pub const HASH: &str = "Hash";
pub const CLEAR_HASH: &str = "Clear Hash";
pub const PONDER: &str = "Ponder";
pub const MULTI_PV: &str = "MultiPV";
pub const MOVE_OVERHEAD: &str = "Move Overhead";
pub const UCI_CHESS960: &str = "UCI_Chess960";
pub const UCI_ANALYSE_MODE: &str = "UCI_AnalyseMode";
pub const UCI_VARIANT: &str = "UCI_Variant";

/// Variant selected by a fresh registry, before the bridge forces its own.
pub const DEFAULT_VARIANT: &str = "chess";

pub const DEFAULT_HASH_MB: i64 = 16;
const MAX_HASH_MB: i64 = 2048;
const MAX_THREADS: i64 = 512;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("No such option: {name}")]
    Unknown { name: String },
    #[error("Invalid value '{value}' for option {name}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Check(bool),
    Spin { value: i64, min: i64, max: i64 },
    Combo { value: String, choices: Vec<String> },
    Button,
}

/// Side effect the engine must apply after an option changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionChange {
    Threads(usize),
    Hash(usize),
    ClearHash,
    MoveOverhead(u64),
    Variant(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOption {
    name: String,
    kind: OptionKind,
}

impl UciOption {
    fn new(name: &str, kind: OptionKind) -> Self {
        UciOption {
            name: name.to_string(),
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    /// Current value rendered the way `setoption` accepts it.
    #[must_use]
    pub fn value(&self) -> String {
        match &self.kind {
            OptionKind::Check(v) => v.to_string(),
            OptionKind::Spin { value, .. } => value.to_string(),
            OptionKind::Combo { value, .. } => value.clone(),
            OptionKind::Button => String::new(),
        }
    }

    fn assign(&mut self, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: self.name.clone(),
            value: value.to_string(),
        };
        match &mut self.kind {
            OptionKind::Check(current) => {
                *current = match value.to_ascii_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(invalid()),
                };
            }
            OptionKind::Spin { value: current, min, max } => {
                let parsed: i64 = value.trim().parse().map_err(|_| invalid())?;
                if parsed < *min || parsed > *max {
                    return Err(invalid());
                }
                *current = parsed;
            }
            OptionKind::Combo { value: current, choices } => {
                let choice = choices
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(value))
                    .ok_or_else(invalid)?;
                *current = choice.clone();
            }
            OptionKind::Button => {}
        }
        Ok(())
    }
}

/// The engine's option table, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    options: Vec<UciOption>,
}

impl OptionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the engine defaults. `variants` lists the
    /// selectable `UCI_Variant` values.
    #[must_use]
    pub fn with_defaults(variants: &[&str]) -> Self {
        let spin = |value, min, max| OptionKind::Spin { value, min, max };
        let choices = variants.iter().map(|v| (*v).to_string()).collect();
        OptionRegistry {
            options: vec![
                UciOption::new(THREADS, spin(1, 1, MAX_THREADS)),
                UciOption::new(HASH, spin(DEFAULT_HASH_MB, 1, MAX_HASH_MB)),
                UciOption::new(CLEAR_HASH, OptionKind::Button),
                UciOption::new(PONDER, OptionKind::Check(false)),
                UciOption::new(MULTI_PV, spin(1, 1, 500)),
                UciOption::new(MOVE_OVERHEAD, spin(10, 0, 5000)),
                UciOption::new(UCI_CHESS960, OptionKind::Check(false)),
                UciOption::new(UCI_ANALYSE_MODE, OptionKind::Check(false)),
                UciOption::new(
                    UCI_VARIANT,
                    OptionKind::Combo {
                        value: DEFAULT_VARIANT.to_string(),
                        choices,
                    },
                ),
            ],
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.options
            .iter()
            .position(|o| o.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UciOption> {
        self.position(name).map(|i| &self.options[i])
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<String> {
        self.get(name).map(UciOption::value)
    }

    #[must_use]
    pub fn spin(&self, name: &str) -> Option<i64> {
        match self.get(name)?.kind {
            OptionKind::Spin { value, .. } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn check(&self, name: &str) -> Option<bool> {
        match self.get(name)?.kind {
            OptionKind::Check(v) => Some(v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &UciOption> {
        self.options.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Validate and store a value, reporting what the engine has to react to.
    pub fn set(&mut self, name: &str, value: &str) -> Result<Option<OptionChange>, OptionError> {
        let idx = self.position(name).ok_or_else(|| OptionError::Unknown {
            name: name.to_string(),
        })?;
        let option = &mut self.options[idx];
        option.assign(value)?;

        let change = match (option.name.as_str(), &option.kind) {
            (THREADS, OptionKind::Spin { value, .. }) => Some(OptionChange::Threads(*value as usize)),
            (HASH, OptionKind::Spin { value, .. }) => Some(OptionChange::Hash(*value as usize)),
            (CLEAR_HASH, _) => Some(OptionChange::ClearHash),
            (MOVE_OVERHEAD, OptionKind::Spin { value, .. }) => {
                Some(OptionChange::MoveOverhead(*value as u64))
            }
            (UCI_VARIANT, OptionKind::Combo { value, .. }) => {
                Some(OptionChange::Variant(value.clone()))
            }
            _ => None,
        };
        Ok(change)
    }

    /// Store a value without notifying anyone.
    pub fn force(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        self.set(name, value).map(|_| ())
    }
}
