//! Brain-file parser.
//!
//! One state per retained line. Lines whose first non-blank character is
//! `#` are skipped, `;` starts a trailing comment, blank lines are skipped.
//! Tokens are split on spaces and tabs and compared case-insensitively.
//!
//! `Sense` accepts a marker condition either as one token (`Marker3`) or
//! as two (`Marker 3`).

use std::fs;
use std::path::Path;

use crate::brain::{
    Brain, Condition, Instruction, MAX_STATE_INDEX, MAX_STATES, SenseDir, StateIndex, TurnSide,
};
use crate::error::{BrainError, BrainErrorKind};
use crate::world::Marker;

/// Parse a brain file. The brain is named after the file stem.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any line is invalid.
pub fn parse_brain(path: impl AsRef<Path>) -> Result<Brain, BrainError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path).map_err(|e| {
        BrainError::new(0, BrainErrorKind::Io(format!("{}: {e}", path.display())))
    })?;
    let name = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
    parse_brain_str(name, &src)
}

/// Parse brain source text.
///
/// # Errors
///
/// Returns the first invalid line; no partial program is produced.
pub fn parse_brain_str(name: impl Into<String>, src: &str) -> Result<Brain, BrainError> {
    let mut states = Vec::new();

    for (idx, raw) in src.lines().enumerate() {
        let line = raw.split(';').next().unwrap_or_default();
        if line.trim_start().starts_with('#') {
            continue;
        }
        let upper = line.to_ascii_uppercase();
        let tokens: Vec<&str> = upper.split_ascii_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let instr = parse_instruction(&tokens).map_err(|kind| BrainError::new(idx + 1, kind))?;
        states.push(instr);
    }

    if states.is_empty() {
        return Err(BrainError::new(0, BrainErrorKind::EmptyProgram));
    }
    if states.len() > MAX_STATES {
        return Err(BrainError::new(
            0,
            BrainErrorKind::TooManyStates(states.len()),
        ));
    }

    Ok(Brain::new(name, states))
}

fn parse_instruction(tokens: &[&str]) -> Result<Instruction, BrainErrorKind> {
    match tokens[0] {
        "SENSE" => {
            let split_marker = tokens.get(4) == Some(&"MARKER");
            arity("SENSE", if split_marker { 6 } else { 5 }, tokens)?;
            let condition = if split_marker {
                Condition::Marker(marker(tokens[5])?)
            } else {
                condition(tokens[4])?
            };
            Ok(Instruction::Sense {
                dir: sense_dir(tokens[1])?,
                on_true: state(tokens[2])?,
                on_false: state(tokens[3])?,
                condition,
            })
        }
        "MARK" => {
            arity("MARK", 3, tokens)?;
            Ok(Instruction::Mark {
                marker: marker(tokens[1])?,
                next: state(tokens[2])?,
            })
        }
        "UNMARK" => {
            arity("UNMARK", 3, tokens)?;
            Ok(Instruction::Unmark {
                marker: marker(tokens[1])?,
                next: state(tokens[2])?,
            })
        }
        "PICKUP" => {
            arity("PICKUP", 3, tokens)?;
            Ok(Instruction::PickUp {
                on_success: state(tokens[1])?,
                on_failure: state(tokens[2])?,
            })
        }
        "DROP" => {
            arity("DROP", 2, tokens)?;
            Ok(Instruction::Drop {
                next: state(tokens[1])?,
            })
        }
        "TURN" => {
            arity("TURN", 3, tokens)?;
            let side = match tokens[1] {
                "LEFT" => TurnSide::Left,
                "RIGHT" => TurnSide::Right,
                other => return Err(out_of_range(other, "LEFT or RIGHT")),
            };
            Ok(Instruction::Turn {
                side,
                next: state(tokens[2])?,
            })
        }
        "MOVE" => {
            arity("MOVE", 3, tokens)?;
            Ok(Instruction::Move {
                on_success: state(tokens[1])?,
                on_failure: state(tokens[2])?,
            })
        }
        "FLIP" => {
            arity("FLIP", 4, tokens)?;
            let p = match tokens[1].parse::<u32>() {
                Ok(p) if p >= 1 => p,
                _ => return Err(out_of_range(tokens[1], "a positive integer")),
            };
            Ok(Instruction::Flip {
                p,
                on_zero: state(tokens[2])?,
                on_other: state(tokens[3])?,
            })
        }
        other => Err(BrainErrorKind::UnknownInstruction(other.to_string())),
    }
}

fn arity(instruction: &'static str, expected: usize, tokens: &[&str]) -> Result<(), BrainErrorKind> {
    if tokens.len() == expected {
        Ok(())
    } else {
        Err(BrainErrorKind::WrongArgCount {
            instruction,
            expected,
            found: tokens.len(),
        })
    }
}

fn out_of_range(token: &str, expected: &'static str) -> BrainErrorKind {
    BrainErrorKind::ArgOutOfRange {
        token: token.to_string(),
        expected,
    }
}

fn state(token: &str) -> Result<StateIndex, BrainErrorKind> {
    token
        .parse::<StateIndex>()
        .ok()
        .filter(|&s| s <= MAX_STATE_INDEX)
        .ok_or_else(|| out_of_range(token, "a state index in 0..=9999"))
}

fn marker(token: &str) -> Result<Marker, BrainErrorKind> {
    token
        .parse::<u8>()
        .ok()
        .and_then(Marker::new)
        .ok_or_else(|| out_of_range(token, "a marker in 0..=5"))
}

fn sense_dir(token: &str) -> Result<SenseDir, BrainErrorKind> {
    match token {
        "HERE" => Ok(SenseDir::Here),
        "AHEAD" => Ok(SenseDir::Ahead),
        "LEFTAHEAD" => Ok(SenseDir::LeftAhead),
        "RIGHTAHEAD" => Ok(SenseDir::RightAhead),
        other => Err(out_of_range(other, "HERE, AHEAD, LEFTAHEAD or RIGHTAHEAD")),
    }
}

fn condition(token: &str) -> Result<Condition, BrainErrorKind> {
    let cond = match token {
        "FRIEND" => Condition::Friend,
        "FOE" => Condition::Foe,
        "FRIENDWITHFOOD" => Condition::FriendWithFood,
        "FOEWITHFOOD" => Condition::FoeWithFood,
        "FOOD" => Condition::Food,
        "ROCK" => Condition::Rock,
        "FOEMARKER" => Condition::FoeMarker,
        "HOME" => Condition::Home,
        "FOEHOME" => Condition::FoeHome,
        other => match other.strip_prefix("MARKER") {
            Some(n) if !n.is_empty() => Condition::Marker(marker(n)?),
            _ => return Err(out_of_range(other, "a sense condition")),
        },
    };
    Ok(cond)
}
