//! Proof-obligation priority queue: a min-heap by frame, ties broken by
//! insertion order.
//!
//! Grounded in `FrontierKey`/`BestFirstFrontier` in
//! `search/src/node.rs`/`search/src/frontier.rs`: `BinaryHeap` is a
//! max-heap, so entries are wrapped in `Reverse` to get min-heap pop
//! order, and a monotonic insertion counter breaks ties for reproducible
//! counterexamples — matching `creation_order` there.
//!
//! Each obligation also carries a parent link ([`ObligationNode::parent`])
//! so that when an obligation reaches frame 0 — meaning the cube
//! intersects the initial states rather than some earlier frame — the
//! predecessor chain back to the original bad cube can be read off
//! directly as the counterexample trace.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::rc::Rc;

use pdr_kernel::cube::TCube;

/// One link in a counterexample-in-progress: a timed cube plus the
/// obligation it was extracted as a predecessor of (`None` for the
/// original bad cube that seeded the inner loop).
#[derive(Debug)]
pub struct ObligationNode {
    pub cube: TCube,
    pub parent: Option<Rc<ObligationNode>>,
}

impl ObligationNode {
    /// A root obligation with no predecessor link.
    #[must_use]
    pub fn root(cube: TCube) -> Rc<Self> {
        Rc::new(Self { cube, parent: None })
    }

    /// A predecessor obligation linked to the node it explains.
    #[must_use]
    pub fn child(cube: TCube, parent: Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            cube,
            parent: Some(parent),
        })
    }

    /// Walk the parent chain from this node (the earliest state in time)
    /// forward to the root bad cube, returning cubes in time order.
    #[must_use]
    pub fn trace(self: &Rc<Self>) -> Vec<pdr_kernel::cube::Cube> {
        let mut out = vec![self.cube.cube.clone()];
        let mut cur = self.clone();
        while let Some(parent) = cur.parent.clone() {
            out.push(parent.cube.cube.clone());
            cur = parent;
        }
        out
    }
}

/// The ordering key for an obligation: lower frame first, then older
/// insertion order first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ObligationKey {
    frame: i64,
    insertion_order: u64,
}

#[derive(Debug)]
struct Entry {
    key: ObligationKey,
    obligation: Rc<ObligationNode>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-heap of proof obligations ordered by ascending frame.
pub struct ObligationQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_insertion_order: u64,
}

impl ObligationQueue {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_insertion_order: 0,
        }
    }

    /// Enqueue an obligation.
    pub fn push(&mut self, obligation: Rc<ObligationNode>) {
        let key = ObligationKey {
            frame: obligation.cube.frame,
            insertion_order: self.next_insertion_order,
        };
        self.next_insertion_order += 1;
        self.heap.push(Reverse(Entry { key, obligation }));
    }

    /// Pop the obligation with the lowest frame, oldest first among ties.
    #[must_use]
    pub fn pop(&mut self) -> Option<Rc<ObligationNode>> {
        self.heap.pop().map(|Reverse(e)| e.obligation)
    }

    /// True if no obligations remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued obligations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl Default for ObligationQueue {
    fn default() -> Self {
        Self::new()
    }
}
