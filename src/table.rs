//! The transition table: `(state, symbol) -> successors` lookup.
//!
//! Construction is through [`TransitionTable::add_transition`] and
//! [`TransitionTable::mark_accepting`] only, mirroring the source's
//! `load_transitions`/`load_acc` split between a construction phase and a
//! read-only lookup phase used by the engine. Each state holds a row array
//! sorted by input symbol; [`TransitionTable::successors`] does a linear scan
//! for small rows and falls back to binary search past
//! [`MAX_SIZE_LINEAR_SEARCH`] symbols, matching `search_tr_out` in
//! `tm-sim.c`.

use crate::types::{Move, StateId, Successor, Symbol};

/// Above this many distinct input symbols for a state, lookup switches from
/// linear scan to binary search. Below it, the linear scan wins: the row
/// array never allocates and the branch predictor handles a handful of
/// comparisons better than the extra indexing binary search needs.
const MAX_SIZE_LINEAR_SEARCH: usize = 4;

#[derive(Debug, Clone, Default)]
struct Row {
    symbol: Symbol,
    successors: Vec<Successor>,
}

#[derive(Debug, Clone, Default)]
struct State {
    rows: Vec<Row>,
    accepting: bool,
}

/// Read-only-after-construction map from `(state, symbol)` to the nonempty
/// set of successors reachable from it. Owned by the machine for the whole
/// run; the engine only ever reads it.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    states: Vec<State>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest state id currently allocated, if any transition or accepting
    /// mark has been recorded.
    pub fn max_state(&self) -> Option<StateId> {
        if self.states.is_empty() {
            None
        } else {
            Some(self.states.len() as StateId - 1)
        }
    }

    fn ensure_state(&mut self, q: StateId) {
        let needed = q as usize + 1;
        if self.states.len() < needed {
            self.states.resize(needed, State::default());
        }
    }

    /// Records `q_in --read/write,mv--> q_out`. Duplicates are not rejected:
    /// inserting the same `(state, input)` pair twice appends a second
    /// successor, which is exactly how nondeterministic branching enters the
    /// table. Grows the state array to cover `q_in`/`q_out` (Open Question:
    /// this spec requires extension, not rejection, of out-of-range
    /// `next_state`s).
    pub fn add_transition(&mut self, q_in: StateId, read: Symbol, write: Symbol, mv: Move, q_out: StateId) {
        self.ensure_state(q_in.max(q_out));

        let successor = Successor {
            next_state: q_out,
            write,
            mv,
        };

        let rows = &mut self.states[q_in as usize].rows;
        match rows.binary_search_by_key(&read, |row| row.symbol) {
            Ok(idx) => rows[idx].successors.push(successor),
            Err(idx) => rows.insert(
                idx,
                Row {
                    symbol: read,
                    successors: vec![successor],
                },
            ),
        }
    }

    /// Marks `q` as accepting. Silently ignored if `q` exceeds every state
    /// seen so far by `add_transition` — such a state is unreachable by
    /// construction, so it can never affect a verdict.
    pub fn mark_accepting(&mut self, q: StateId) {
        if let Some(state) = self.states.get_mut(q as usize) {
            state.accepting = true;
        }
    }

    /// Whether `q` is in the accepting set. States beyond the table's range
    /// are never accepting.
    pub fn is_accepting(&self, q: StateId) -> bool {
        self.states.get(q as usize).is_some_and(|s| s.accepting)
    }

    /// The ordered list of successors for `(state, symbol)`, or an empty
    /// slice if no transition is defined — callers read "empty" as "this
    /// branch halts here". Order matches insertion order, which the engine
    /// relies on for which successor continues the branch vs. which ones
    /// fork off as clones (see the engine's step semantics).
    pub fn successors(&self, state: StateId, symbol: Symbol) -> &[Successor] {
        let Some(rows) = self.states.get(state as usize).map(|s| s.rows.as_slice()) else {
            return &[];
        };

        if rows.len() <= MAX_SIZE_LINEAR_SEARCH {
            for row in rows {
                if row.symbol == symbol {
                    return &row.successors;
                }
            }
            &[]
        } else {
            match rows.binary_search_by_key(&symbol, |row| row.symbol) {
                Ok(idx) => &rows[idx].successors,
                Err(_) => &[],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_and_symbol_have_no_successors() {
        let table = TransitionTable::new();
        assert!(table.successors(0, b'a').is_empty());
    }

    #[test]
    fn single_transition_roundtrips() {
        let mut table = TransitionTable::new();
        table.add_transition(0, b'a', b'x', Move::Right, 1);

        let succ = table.successors(0, b'a');
        assert_eq!(succ.len(), 1);
        assert_eq!(succ[0].next_state, 1);
        assert_eq!(succ[0].write, b'x');
        assert_eq!(succ[0].mv, Move::Right);

        assert!(table.successors(0, b'b').is_empty());
    }

    #[test]
    fn duplicate_inserts_become_additional_successors_in_insertion_order() {
        let mut table = TransitionTable::new();
        table.add_transition(0, b'a', b'b', Move::Right, 0);
        table.add_transition(0, b'a', b'a', Move::Right, 1);

        let succ = table.successors(0, b'a');
        assert_eq!(succ.len(), 2);
        assert_eq!(succ[0].next_state, 0);
        assert_eq!(succ[1].next_state, 1);
    }

    #[test]
    fn rows_stay_sorted_regardless_of_insertion_order() {
        let mut table = TransitionTable::new();
        for sym in [b'd', b'b', b'a', b'c'] {
            table.add_transition(0, sym, sym, Move::Stay, 0);
        }
        for sym in [b'a', b'b', b'c', b'd'] {
            assert_eq!(table.successors(0, sym)[0].write, sym);
        }
    }

    #[test]
    fn lookup_past_linear_threshold_uses_binary_search_path() {
        let mut table = TransitionTable::new();
        let symbols: Vec<Symbol> = (b'a'..=b'j').collect(); // 10 distinct symbols
        for (i, &sym) in symbols.iter().enumerate() {
            table.add_transition(0, sym, sym, Move::Stay, i as StateId);
        }
        for (i, &sym) in symbols.iter().enumerate() {
            assert_eq!(table.successors(0, sym)[0].next_state, i as StateId);
        }
        assert!(table.successors(0, b'z').is_empty());
    }

    #[test]
    fn accepting_set_ignores_out_of_range_state() {
        let mut table = TransitionTable::new();
        table.add_transition(0, b'a', b'a', Move::Stay, 1);
        table.mark_accepting(5); // never referenced by a transition
        assert!(!table.is_accepting(5));
        assert!(table.max_state() == Some(1));
    }

    #[test]
    fn add_transition_grows_state_array_for_next_state() {
        let mut table = TransitionTable::new();
        table.add_transition(0, b'a', b'a', Move::Right, 7);
        assert_eq!(table.max_state(), Some(7));
        table.mark_accepting(7);
        assert!(table.is_accepting(7));
    }
}
