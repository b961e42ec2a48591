//! A single live path through the nondeterministic computation tree.

use std::rc::Rc;

use crate::tape::{Head, SharedTape};
use crate::types::{Move, StateId, Successor, Symbol};

/// One point in the computation tree: current state, head position, step
/// count, the tape it reads/writes, and the transition queued to apply next.
///
/// `pending` is load-bearing, per the source: it decouples "the next
/// transition is known" from "the next transition has been applied", which
/// is what lets the engine re-enqueue a continuing branch alongside its
/// freshly forked siblings without re-deriving anything.
pub struct Branch {
    pub state: StateId,
    pub head: Head,
    pub steps: u32,
    pub tape: SharedTape,
    pub pending: Option<Successor>,
}

impl Branch {
    /// The root branch for a fresh input: state 0, head at the tape's
    /// leftmost allocated page (or the origin, if the tape is empty), zero
    /// steps, nothing pending.
    pub fn root(state: StateId, tape: SharedTape) -> Self {
        let head = tape.leftmost();
        Branch {
            state,
            head,
            steps: 0,
            tape,
            pending: None,
        }
    }

    /// The symbol currently under the head; blank if no page is allocated
    /// there.
    pub fn read_head(&self) -> Symbol {
        self.tape.read(self.head)
    }

    /// Writes `sym` at the head. A write that doesn't change the symbol
    /// already there skips `Rc::make_mut` entirely, so two branches sharing
    /// a tape stay sharing it until one of them genuinely diverges.
    pub fn write_head(&mut self, sym: Symbol) {
        if self.tape.read(self.head) == sym {
            return;
        }
        self.head = Rc::make_mut(&mut self.tape).write(self.head, sym);
    }

    /// Moves the head. Only clones a shared tape when the move would
    /// actually allocate a new page (crossing the edge of the chain
    /// already built); repositioning within existing pages, or moving while
    /// no page exists at all, resolves through `Tape::move_within` (a
    /// `&self` lookup) and so never clones.
    pub fn move_head(&mut self, dir: Move) {
        self.head = match self.tape.move_within(self.head, dir) {
            Some(head) => head,
            None => Rc::make_mut(&mut self.tape).move_head(self.head, dir),
        };
    }

    /// Produces a sibling that shares this branch's tape (bumping its
    /// reference count) with the given transition queued up. State, head,
    /// and step count are copied as-is; the sibling owns nothing but its
    /// runqueue slot and its reference on the tape.
    pub fn clone_sharing_tape(&self, pending: Successor) -> Branch {
        Branch {
            state: self.state,
            head: self.head,
            steps: self.steps,
            tape: Rc::clone(&self.tape),
            pending: Some(pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::Tape;
    use crate::types::BLANK;

    #[test]
    fn write_then_clone_then_write_keeps_original_intact() {
        let tape: SharedTape = Rc::new(Tape::new());
        let mut root = Branch::root(0, tape);
        root.write_head(b'a');

        let mut sibling = root.clone_sharing_tape(Successor {
            next_state: 1,
            write: b'b',
            mv: Move::Right,
        });

        sibling.write_head(b'X');

        assert_eq!(root.read_head(), b'a');
        assert_eq!(sibling.read_head(), b'X');
    }

    #[test]
    fn write_same_symbol_preserves_sharing() {
        let tape: SharedTape = Rc::new(Tape::new());
        let mut root = Branch::root(0, tape);
        root.write_head(b'a');

        let mut sibling = root.clone_sharing_tape(Successor {
            next_state: 1,
            write: b'a',
            mv: Move::Stay,
        });

        assert_eq!(Rc::strong_count(&root.tape), 2);
        sibling.write_head(b'a'); // same symbol: must not clone
        assert_eq!(Rc::strong_count(&root.tape), 2);
    }

    #[test]
    fn move_within_existing_page_preserves_sharing() {
        let tape: SharedTape = Rc::new(Tape::new());
        let mut root = Branch::root(0, tape);
        root.write_head(b'a');

        let mut sibling = root.clone_sharing_tape(Successor {
            next_state: 1,
            write: b'a',
            mv: Move::Stay,
        });

        assert_eq!(Rc::strong_count(&root.tape), 2);
        sibling.move_head(Move::Right);
        sibling.move_head(Move::Left);
        assert_eq!(Rc::strong_count(&root.tape), 2);
        assert_eq!(sibling.read_head(), b'a');
    }

    #[test]
    fn move_crossing_an_unbuilt_page_edge_clones_before_allocating() {
        let tape: SharedTape = Rc::new(Tape::new());
        let mut root = Branch::root(0, tape);
        root.write_head(b'a');

        let mut sibling = root.clone_sharing_tape(Successor {
            next_state: 1,
            write: b'a',
            mv: Move::Stay,
        });

        sibling.move_head(Move::Left); // crosses into an unbuilt page: must clone

        assert_eq!(Rc::strong_count(&root.tape), 1);
        assert_eq!(root.read_head(), b'a');
        assert_eq!(sibling.read_head(), BLANK);
    }
}
