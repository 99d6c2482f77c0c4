//! The frame manager: the activation-variable-guarded clause sequence
//! R_0, R_1, …, R_top inside a single persistent SAT solver.
//!
//! Grounded in `_actVars`/`newActVar`/`blockCubeInSolver` in
//! `examples/original_source/pdr/v3SvrPDRSat.cpp`. One activation variable
//! per frame (including frame 0); a cube blocked at frame `k` adds a
//! single clause guarded by `¬a_k`, so the monotone "blocked at k ⇒
//! blocked at every k' ≥ k" relation is realized by assuming `{a_k,
//! a_{k+1}, …, a_top}` together rather than by copying the clause into
//! every frame.

use pdr_kernel::cube::{Cube, TCube, FRAME_INF};
use pdr_kernel::oracle::{Lit, SatSolver, Var};

/// Owns the activation-variable vector. Holds no reference to the solver
/// or the transition-relation variable map — every method that touches
/// the solver takes it (and the per-latch depth-0 variable slice) as a
/// parameter: narrow, explicit collaborators over an implicit
/// shared-everything struct.
pub struct FrameManager {
    act_vars: Vec<Var>,
}

impl FrameManager {
    /// An empty frame sequence: no frames exist yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            act_vars: Vec::new(),
        }
    }

    /// Number of frames created so far (`R_0` counts as one).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.act_vars.len()
    }

    /// The index of the most recently created frame. Panics if no frame
    /// has been created yet — querying `top` before `new_frame` is a
    /// programmer error.
    #[must_use]
    pub fn top(&self) -> usize {
        self.act_vars
            .len()
            .checked_sub(1)
            .expect("top() called before any frame exists")
    }

    /// The activation variable for frame `k`.
    #[must_use]
    pub fn act_var(&self, k: usize) -> Var {
        self.act_vars[k]
    }

    /// Allocate a fresh activation variable for the next frame. When this
    /// is frame 0, also assert `R_0 = I`: for every latch, the clause
    /// `lit ∨ ¬a_0` where `lit` is that latch's initial-state literal
    /// (a real per-latch initial value rather than a hardcoded all-zero).
    ///
    /// `initial_literals` must be supplied exactly when creating frame 0,
    /// and is ignored otherwise.
    pub fn new_frame<S: SatSolver>(
        &mut self,
        solver: &mut S,
        initial_literals: Option<&[Lit]>,
    ) -> usize {
        let a_k = solver.new_var();
        let k = self.act_vars.len();
        self.act_vars.push(a_k);
        if k == 0 {
            let literals =
                initial_literals.expect("frame 0 requires the initial-state literal vector");
            for &lit in literals {
                solver.add_clause(&[lit, Lit::neg(a_k)]);
            }
        }
        k
    }

    /// Assumption literals `{a_k, a_{k+1}, …, a_top}` restricting a solve
    /// to "every frame from `k` upward". Empty if `k` is past the last
    /// created frame.
    #[must_use]
    pub fn assume_frames(&self, k: usize) -> Vec<Lit> {
        self.act_vars
            .get(k..)
            .unwrap_or(&[])
            .iter()
            .copied()
            .map(Lit::pos)
            .collect()
    }

    /// Add the blocking clause for `s` to the solver: `(⋁_i ¬lit_i(c)) ∨
    /// ¬a_k` for a finite frame, or the bare clause (no activation
    /// literal, permanent) for [`FRAME_INF`].
    ///
    /// `latch_vars0` is the depth-0 variable for each latch, in latch-index
    /// order. Panics if `s.frame == 0` — blocking at frame 0 would negate
    /// the initial-state encoding itself and is a programmer error.
    pub fn block_cube_in_solver<S: SatSolver>(
        &self,
        solver: &mut S,
        latch_vars0: &[Var],
        s: &TCube,
    ) {
        assert!(s.frame != 0, "blocking a cube at frame 0 is a programmer error");
        let mut lits: Vec<Lit> = s
            .cube
            .values()
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_dont_care())
            .map(|(i, v)| Lit::new(latch_vars0[i], v.bit()))
            .collect();
        if s.frame != FRAME_INF {
            let k = usize::try_from(s.frame).expect("negative finite frame index");
            lits.push(Lit::neg(self.act_var(k)));
        }
        solver.add_clause(&lits);
    }

    /// Debug-only check that `c` is inductive relative to frame `d`:
    /// `R_{d-1} ∧ ¬c ∧ T ⇒ ¬c'`. Ported from `assertCubeUNSAT` in
    /// `examples/original_source/pdr/v3SvrPDRSat.cpp`, which the original
    /// calls only from commented-out debug call sites. Exposed here as an
    /// invariant check for tests, not part of the PDR algorithm's control
    /// flow.
    pub fn assert_cube_inductive<S: SatSolver>(
        &self,
        solver: &mut S,
        latch_vars0: &[Var],
        latch_vars1: &[Var],
        c: &Cube,
        d: i64,
    ) -> bool {
        assert!(d > 0, "assert_cube_inductive requires d >= 1");
        let mut assumptions: Vec<Lit> = c
            .values()
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_dont_care())
            .map(|(i, v)| Lit::new(latch_vars1[i], !v.bit()))
            .collect();

        let t = solver.new_var();
        let mut not_c: Vec<Lit> = c
            .values()
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_dont_care())
            .map(|(i, v)| Lit::new(latch_vars0[i], !v.bit()))
            .collect();
        not_c.push(Lit::neg(t));
        solver.add_clause(&not_c);
        assumptions.push(Lit::pos(t));

        #[allow(clippy::cast_sign_loss)]
        let k = (d - 1) as usize;
        assumptions.extend(self.assume_frames(k));

        let sat = solver.solve_assuming(&assumptions);
        solver.add_unit(Lit::neg(t));
        !sat
    }
}

impl Default for FrameManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdr_kernel::oracle::LBool;

    struct ToySolver {
        next_var: u32,
        clauses: Vec<Vec<Lit>>,
    }

    impl ToySolver {
        fn new() -> Self {
            Self {
                next_var: 0,
                clauses: Vec::new(),
            }
        }
    }

    impl SatSolver for ToySolver {
        fn new_var(&mut self) -> Var {
            let v = Var::new(self.next_var);
            self.next_var += 1;
            v
        }
        fn add_clause(&mut self, lits: &[Lit]) {
            self.clauses.push(lits.to_vec());
        }
        fn solve(&mut self) -> bool {
            true
        }
        fn solve_assuming(&mut self, _assumptions: &[Lit]) -> bool {
            true
        }
        fn okay(&self) -> bool {
            true
        }
        fn model_value(&self, _v: Var) -> LBool {
            LBool::Undef
        }
        fn conflict(&self) -> &[Lit] {
            &[]
        }
        fn simplify_db(&mut self) -> bool {
            true
        }
    }

    #[test]
    fn new_frame_zero_asserts_initial_literals() {
        let mut solver = ToySolver::new();
        let mut frames = FrameManager::new();
        let latch_var = solver.new_var();
        let init = vec![Lit::neg(latch_var)];
        let idx = frames.new_frame(&mut solver, Some(&init));
        assert_eq!(idx, 0);
        assert_eq!(solver.clauses.len(), 1);
        assert!(solver.clauses[0].contains(&Lit::neg(latch_var)));
    }

    #[test]
    #[should_panic(expected = "requires the initial-state literal vector")]
    fn new_frame_zero_without_initial_literals_panics() {
        let mut solver = ToySolver::new();
        let mut frames = FrameManager::new();
        frames.new_frame(&mut solver, None);
    }

    #[test]
    fn assume_frames_returns_suffix_of_activation_literals() {
        let mut solver = ToySolver::new();
        let mut frames = FrameManager::new();
        frames.new_frame(&mut solver, Some(&[]));
        frames.new_frame(&mut solver, None);
        frames.new_frame(&mut solver, None);

        let assumed = frames.assume_frames(1);
        assert_eq!(assumed, vec![Lit::pos(frames.act_var(1)), Lit::pos(frames.act_var(2))]);
    }

    #[test]
    fn assume_frames_past_top_is_empty() {
        let mut solver = ToySolver::new();
        let mut frames = FrameManager::new();
        frames.new_frame(&mut solver, Some(&[]));
        assert!(frames.assume_frames(5).is_empty());
    }

    #[test]
    #[should_panic(expected = "programmer error")]
    fn blocking_at_frame_zero_panics() {
        let mut solver = ToySolver::new();
        let mut frames = FrameManager::new();
        frames.new_frame(&mut solver, Some(&[]));
        let latch_var = solver.new_var();
        let s = TCube::new(Cube::all_zero(1), 0);
        frames.block_cube_in_solver(&mut solver, &[latch_var], &s);
    }

    #[test]
    fn blocking_a_finite_frame_guards_the_clause_with_its_activation_literal() {
        let mut solver = ToySolver::new();
        let mut frames = FrameManager::new();
        frames.new_frame(&mut solver, Some(&[]));
        frames.new_frame(&mut solver, None);
        let latch_var = solver.new_var();
        let s = TCube::new(Cube::all_zero(1), 1);
        frames.block_cube_in_solver(&mut solver, &[latch_var], &s);

        let clause = solver.clauses.last().unwrap();
        assert!(clause.contains(&Lit::neg(frames.act_var(1))));
    }

    #[test]
    fn blocking_at_frame_inf_omits_the_activation_literal() {
        let mut solver = ToySolver::new();
        let mut frames = FrameManager::new();
        frames.new_frame(&mut solver, Some(&[]));
        let latch_var = solver.new_var();
        let s = TCube::new(Cube::all_zero(1), FRAME_INF);
        frames.block_cube_in_solver(&mut solver, &[latch_var], &s);

        let clause = solver.clauses.last().unwrap();
        assert_eq!(clause.len(), 1, "no activation literal for FRAME_INF");
    }
}
