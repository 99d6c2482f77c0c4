//! `ToySatSolver`: a small incremental CNF solver implementing
//! [`SatSolver`], for exercising the engine end to end without pulling in
//! a production solver crate.
//!
//! The trait shape (`add_clause`, `solve_assuming`, `model_value`,
//! `conflict`) follows the `SolverCore` family in
//! `examples/other_examples/33f770c5_rljacobson-ZSAT__src-solver.rs.rs`,
//! but the implementation itself is a plain recursive DPLL: unit
//! propagation to a fixpoint, then branch on the first unassigned
//! variable. There is no clause learning or watched literals — adequate
//! for the small hand-built networks this crate's tests and scenarios
//! use, not for anything resembling production SAT-solving performance.
//!
//! UNSAT cores are computed by deletion-based minimization over the
//! assumption set rather than resolution-trace extraction: repeatedly
//! drop one assumption literal and re-solve; keep the drop if the
//! instance is still UNSAT. The result is a locally minimal unsatisfiable
//! subset of the assumptions, which is all [`PdrEngine`](pdr_engine::PdrEngine)
//! needs.

use pdr_kernel::oracle::{LBool, Lit, SatSolver, Var};

/// A naive, assumption-solving, core-extracting CNF solver.
pub struct ToySatSolver {
    num_vars: u32,
    clauses: Vec<Vec<Lit>>,
    model: Vec<LBool>,
    last_core: Vec<Lit>,
}

impl ToySatSolver {
    /// An empty solver with no variables or clauses.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_vars: 0,
            clauses: Vec::new(),
            model: Vec::new(),
            last_core: Vec::new(),
        }
    }
}

impl Default for ToySatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatSolver for ToySatSolver {
    fn new_var(&mut self) -> Var {
        let v = Var::new(self.num_vars);
        self.num_vars += 1;
        v
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        self.clauses.push(lits.to_vec());
    }

    fn solve(&mut self) -> bool {
        self.solve_assuming(&[])
    }

    fn solve_assuming(&mut self, assumptions: &[Lit]) -> bool {
        match dpll(&self.clauses, assumptions, self.num_vars) {
            Some(model) => {
                self.model = model;
                true
            }
            None => {
                self.last_core = minimize_core(&self.clauses, assumptions, self.num_vars);
                false
            }
        }
    }

    fn okay(&self) -> bool {
        true
    }

    fn model_value(&self, v: Var) -> LBool {
        self.model
            .get(v.index() as usize)
            .copied()
            .unwrap_or(LBool::Undef)
    }

    fn conflict(&self) -> &[Lit] {
        &self.last_core
    }

    fn simplify_db(&mut self) -> bool {
        true
    }
}

fn lit_value(assign: &[LBool], lit: Lit) -> LBool {
    match assign[lit.var().index() as usize] {
        LBool::Undef => LBool::Undef,
        LBool::True => {
            if lit.is_negated() {
                LBool::False
            } else {
                LBool::True
            }
        }
        LBool::False => {
            if lit.is_negated() {
                LBool::True
            } else {
                LBool::False
            }
        }
    }
}

enum PropResult {
    Conflict,
    Fixpoint,
}

fn unit_propagate(clauses: &[Vec<Lit>], assign: &mut [LBool]) -> PropResult {
    loop {
        let mut changed = false;
        for clause in clauses {
            let mut satisfied = false;
            let mut unassigned_count = 0;
            let mut last_unassigned = None;
            for &lit in clause {
                match lit_value(assign, lit) {
                    LBool::True => {
                        satisfied = true;
                        break;
                    }
                    LBool::False => {}
                    LBool::Undef => {
                        unassigned_count += 1;
                        last_unassigned = Some(lit);
                    }
                }
            }
            if satisfied {
                continue;
            }
            if unassigned_count == 0 {
                return PropResult::Conflict;
            }
            if unassigned_count == 1 {
                let lit = last_unassigned.expect("unassigned_count == 1");
                let value = if lit.is_negated() {
                    LBool::False
                } else {
                    LBool::True
                };
                let slot = &mut assign[lit.var().index() as usize];
                if *slot != value {
                    *slot = value;
                    changed = true;
                }
            }
        }
        if !changed {
            return PropResult::Fixpoint;
        }
    }
}

fn search(clauses: &[Vec<Lit>], assign: &mut Vec<LBool>) -> Option<Vec<LBool>> {
    if matches!(unit_propagate(clauses, assign), PropResult::Conflict) {
        return None;
    }
    let Some(branch_var) = assign.iter().position(|&v| v == LBool::Undef) else {
        return Some(assign.clone());
    };
    for value in [LBool::True, LBool::False] {
        let mut next = assign.clone();
        next[branch_var] = value;
        if let Some(model) = search(clauses, &mut next) {
            return Some(model);
        }
    }
    None
}

fn dpll(clauses: &[Vec<Lit>], assumptions: &[Lit], num_vars: u32) -> Option<Vec<LBool>> {
    let mut assign = vec![LBool::Undef; num_vars as usize];
    for &lit in assumptions {
        assign[lit.var().index() as usize] = if lit.is_negated() {
            LBool::False
        } else {
            LBool::True
        };
    }
    search(clauses, &mut assign)
}

fn minimize_core(clauses: &[Vec<Lit>], assumptions: &[Lit], num_vars: u32) -> Vec<Lit> {
    let mut core: Vec<Lit> = assumptions.to_vec();
    let mut i = 0;
    while i < core.len() {
        let mut trial = core.clone();
        trial.remove(i);
        if dpll(clauses, &trial, num_vars).is_none() {
            core = trial;
        } else {
            i += 1;
        }
    }
    core
}
