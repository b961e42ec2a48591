//! The scheduler: a LIFO stack of runnable branches.
//!
//! LIFO is the only discipline, and it's load-bearing, not incidental: the
//! engine pushes a step's nondeterministic siblings on top of the branch
//! that continues, so they run (and, on an eventual write, clone off the
//! shared tape) before that branch gets another turn. This keeps at most one
//! live clone of a shared tape at a time in the common case instead of
//! fanning every sibling's clone out simultaneously.

use crate::branch::Branch;

#[derive(Default)]
pub struct Runqueue {
    branches: Vec<Branch>,
}

impl Runqueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, branch: Branch) {
        self.branches.push(branch);
    }

    pub fn pop(&mut self) -> Option<Branch> {
        self.branches.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::Tape;
    use std::rc::Rc;

    #[test]
    fn pop_returns_most_recently_pushed() {
        let mut rq = Runqueue::new();
        let tape = Rc::new(Tape::new());
        rq.push(Branch::root(0, Rc::clone(&tape)));
        rq.push(Branch::root(1, Rc::clone(&tape)));

        assert_eq!(rq.pop().unwrap().state, 1);
        assert_eq!(rq.pop().unwrap().state, 0);
        assert!(rq.pop().is_none());
    }
}
