//! Drives one input tape to a verdict: seeds the root branch, runs the
//! scheduling loop, and aggregates the outcome.

use std::rc::Rc;

use crate::branch::Branch;
use crate::runqueue::Runqueue;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{Move, Symbol, Verdict, INITIAL_STATE};

/// Called once per step, after a branch has finished applying any pending
/// transition and before the engine decides what to do next. Used by the
/// CLI's `--debug` trace; the engine itself never inspects the callback's
/// side effects.
pub type StepTrace<'a> = dyn FnMut(&Branch) + 'a;

/// Ties a [`TransitionTable`] to a step bound and runs inputs against it.
/// Stateless across calls to [`Engine::run`] beyond the table and bound
/// themselves — each call is an independent computation, per the source's
/// "no concurrency across inputs" non-goal.
pub struct Engine<'t> {
    table: &'t TransitionTable,
    max_steps: u32,
}

impl<'t> Engine<'t> {
    pub fn new(table: &'t TransitionTable, max_steps: u32) -> Self {
        Engine { table, max_steps }
    }

    /// Decides the verdict for `input`. Builds the root tape by writing
    /// `input` from offset 0 (truncated to `max_steps` symbols — a branch
    /// would be preempted before reading further anyway), rewinds the head,
    /// and runs the scheduling loop to completion or to an accepting halt.
    pub fn run(&self, input: &[Symbol]) -> Verdict {
        self.run_traced(input, &mut |_| {})
    }

    /// Same as [`Engine::run`], invoking `trace` once per completed step
    /// (after the pending transition has been applied and before the next
    /// lookup) for callers that want a debug log.
    pub fn run_traced(&self, input: &[Symbol], trace: &mut StepTrace<'_>) -> Verdict {
        let tape = Rc::new(self.build_root_tape(input));
        let root = Branch::root(INITIAL_STATE, tape);

        let mut rq = Runqueue::new();
        rq.push(root);

        let mut preempted = false;

        while let Some(mut branch) = rq.pop() {
            if branch.steps == self.max_steps {
                // Preempted: destroyed without further stepping.
                preempted = true;
                continue;
            }

            match self.step(&mut branch, &mut rq) {
                StepOutcome::Accept => {
                    // Short-circuit: remaining branches are destroyed
                    // unexamined, in arbitrary order.
                    return Verdict::Accept;
                }
                StepOutcome::Halt => {
                    // Branch destroyed, not accepting; continue the loop.
                }
                StepOutcome::Continue => {
                    trace(&branch);
                    rq.push(branch);
                }
            }
        }

        if preempted {
            Verdict::Undetermined
        } else {
            Verdict::Reject
        }
    }

    fn build_root_tape(&self, input: &[Symbol]) -> Tape {
        let mut tape = Tape::new();
        let bound = self.max_steps as usize;
        let truncated = if input.len() > bound {
            &input[..bound]
        } else {
            input
        };

        let mut head = crate::tape::Head::origin();
        for &sym in truncated {
            head = tape.write(head, sym);
            head = tape.move_head(head, Move::Right);
        }
        tape
    }

    /// Applies one step to `branch`, per the engine's step semantics:
    ///
    /// 1. If a transition is pending, apply it (write, move, advance state
    ///    and step count).
    /// 2. Look up successors for the resulting `(state, symbol)`.
    /// 3. Empty successor list: the branch halts — accept if the state is
    ///    accepting, otherwise just halt.
    /// 4. Otherwise queue the first successor as this branch's pending
    ///    transition and push it back; clone off one sibling per remaining
    ///    successor, each pushed on top (LIFO: siblings run before the
    ///    continuing branch gets another turn).
    fn step(&self, branch: &mut Branch, rq: &mut Runqueue) -> StepOutcome {
        if let Some(pending) = branch.pending.take() {
            branch.state = pending.next_state;
            branch.write_head(pending.write);
            branch.move_head(pending.mv);
            branch.steps += 1;
        }

        let symbol = branch.read_head();
        let successors = self.table.successors(branch.state, symbol);

        if successors.is_empty() {
            return if self.table.is_accepting(branch.state) {
                StepOutcome::Accept
            } else {
                StepOutcome::Halt
            };
        }

        let (first, rest) = successors.split_first().expect("checked non-empty above");
        for &successor in rest {
            rq.push(branch.clone_sharing_tape(successor));
        }
        branch.pending = Some(*first);

        StepOutcome::Continue
    }
}

enum StepOutcome {
    Accept,
    Halt,
    Continue,
}
