//! Parses the four-section, line-oriented machine description from
//! `spec.md` §6 into a [`TransitionTable`], a step bound, and an iterator of
//! `run` input lines, using the engine's construction API
//! (`add_transition`, `mark_accepting`) exactly as the parser/loader
//! collaborator the source describes would.
//!
//! Grammar:
//!
//! ```text
//! tr
//! <state> <in> <out> <move> <next_state>   (repeated, zero or more)
//! acc
//! <state>                                   (repeated, zero or more)
//! max
//! <n>
//! run
//! <tape_string>                             (repeated until EOF)
//! ```

use pest::iterators::Pair;
use pest::Parser as PestParser;
use pest_derive::Parser as PestParser;

use crate::table::TransitionTable;
use crate::types::{LoadError, Move, StateId, Symbol};

#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct MachineParser;

/// A fully loaded machine: its transition table (accepting set already
/// folded in via `mark_accepting`), its step bound, and the raw `run` lines
/// still to be simulated.
pub struct Loaded {
    pub table: TransitionTable,
    pub max_steps: u32,
    pub run_inputs: Vec<String>,
}

/// Parses `input` (the whole machine-description stream) into a
/// [`Loaded`] machine.
pub fn load(input: &str) -> Result<Loaded, LoadError> {
    let mut pairs = MachineParser::parse(Rule::stream, input)
        .map_err(|e| LoadError::Grammar(Box::new(e)))?;
    let stream = pairs.next().expect("stream rule always produces one pair");

    let mut table = TransitionTable::new();
    let mut max_steps: Option<u32> = None;
    let mut run_inputs = Vec::new();

    for section in stream.into_inner() {
        match section.as_rule() {
            Rule::tr_section => {
                for line in section.into_inner() {
                    if line.as_rule() == Rule::tr_line {
                        apply_tr_line(&mut table, line);
                    }
                }
            }
            Rule::acc_section => {
                for line in section.into_inner() {
                    if line.as_rule() == Rule::acc_line {
                        let q = parse_state(line.into_inner().next().unwrap());
                        table.mark_accepting(q);
                    }
                }
            }
            Rule::max_section => {
                for line in section.into_inner() {
                    if line.as_rule() == Rule::max_line {
                        let n = line.into_inner().next().unwrap().as_str();
                        max_steps = n.parse().ok();
                    }
                }
            }
            Rule::run_section => {
                for line in section.into_inner() {
                    if matches!(line.as_rule(), Rule::run_line | Rule::last_run_line) {
                        // `line`'s own span includes the trailing NEWLINE (or,
                        // for the final line, nothing extra); pull the
                        // `tape_string` child instead so the newline itself
                        // never ends up in the input string.
                        let tape_string = line.into_inner().next().unwrap();
                        run_inputs.push(tape_string.as_str().to_string());
                    }
                }
            }
            Rule::EOI => {}
            _ => {}
        }
    }

    Ok(Loaded {
        table,
        max_steps: max_steps.ok_or(LoadError::InvalidMaxSteps)?,
        run_inputs,
    })
}

fn apply_tr_line(table: &mut TransitionTable, line: Pair<Rule>) {
    let mut fields = line.into_inner();
    let q_in = parse_state(fields.next().unwrap());
    let read: Symbol = fields.next().unwrap().as_str().as_bytes()[0];
    let write: Symbol = fields.next().unwrap().as_str().as_bytes()[0];
    let mv = parse_direction(fields.next().unwrap());
    let q_out = parse_state(fields.next().unwrap());

    table.add_transition(q_in, read, write, mv, q_out);
}

fn parse_state(pair: Pair<Rule>) -> StateId {
    pair.as_str().parse().expect("grammar guarantees digits")
}

fn parse_direction(pair: Pair<Rule>) -> Move {
    match pair.as_str() {
        "L" => Move::Left,
        "R" => Move::Right,
        "S" => Move::Stay,
        other => unreachable!("grammar only admits L/S/R, got {other:?}"),
    }
}
