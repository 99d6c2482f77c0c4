//! The PDR engine: bad-cube extraction, the proof-obligation inner loop,
//! relative induction, and frame extension/propagation.
//!
//! Grounded in `getBadCube`/`solveRelative`/`UNSATGeneralizationWithUNSATCore`
//! in `examples/original_source/pdr/v3SvrPDRSat.cpp`; the outer
//! frame-extension loop that those methods are driven by (not present in
//! the excerpted original source) is this crate's own design. The overall
//! `run` shape — a loop producing a single always-`Ok` outcome enum rather
//! than threading success/failure through `Result` — mirrors `search()`'s
//! `SearchResult` in `search/src/search.rs`.

use std::rc::Rc;

use pdr_kernel::cube::{Cube, TCube, FRAME_INF};
use pdr_kernel::oracle::{Lit, NetId, NetRef, NetworkOracle, SatSolver, Var};
use pdr_kernel::ternary::Ternary;

use crate::encoder::TransitionRelationEncoder;
use crate::error::PdrError;
use crate::frames::FrameManager;
use crate::obligation::{ObligationNode, ObligationQueue};
use crate::ternary_sim::TernarySimulator;

/// Bounded resource configuration for a single verification run.
#[derive(Debug, Clone, Copy)]
pub struct PdrConfig {
    /// Maximum number of frames (including `R_0`) to allocate before
    /// giving up with [`PdrError::FrameBudgetExhausted`].
    pub max_frames: usize,
}

impl Default for PdrConfig {
    fn default() -> Self {
        Self { max_frames: 1000 }
    }
}

/// The query mode for [`PdrEngine::solve_relative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeMode {
    /// `SAT ? [R_{k-1} ∧ ¬s ∧ T ∧ s']` — enforces relative induction and,
    /// on SAT, extracts and generalizes a predecessor cube.
    ExtractModel,
    /// `SAT ? [R_{k-1} ∧ T ∧ s']` — used only to test whether a blocked
    /// cube can be pushed forward a frame; the caller does not need a
    /// model on SAT.
    NoInduct,
}

/// One step of the engine's audit trail. Carries no secrets and nothing
/// that doubles as a logging framework — a plain return-value record, in
/// the style of `SearchGraphV1` in `search/src/graph.rs`.
#[derive(Debug, Clone)]
pub enum PdrEvent {
    BadCubeExtracted { frame: usize },
    NoBadStateAtFrame { frame: usize },
    ObligationBlocked { frame: i64 },
    FrameExtended { frame: usize },
    PropertyProved { frame: usize },
    CounterexampleFound { length: usize },
}

/// The accumulated trail of engine events for one run.
#[derive(Debug, Clone, Default)]
pub struct PdrTrace {
    events: Vec<PdrEvent>,
}

impl PdrTrace {
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: PdrEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[PdrEvent] {
        &self.events
    }
}

/// The final verdict of a PDR run.
#[derive(Debug, Clone)]
pub enum PdrOutcome {
    /// Two consecutive frames coincided: the property is inductively
    /// proved at `proved_at_frame`.
    Safe { proved_at_frame: usize },
    /// A concrete counterexample trace, in time order (initial state
    /// first, the state violating the monitor last).
    Counterexample { trace: Vec<Cube> },
}

/// Ties the frame manager, the transition-relation encoder, and the
/// ternary simulator together into the PDR control loop.
pub struct PdrEngine<'a, N: NetworkOracle, S: SatSolver> {
    network: &'a N,
    solver: &'a mut S,
    encoder: TransitionRelationEncoder,
    frames: FrameManager,
    sim: TernarySimulator,
    dfs_order: Vec<NetId>,
    monitor: NetRef,
    latch_vars0: Vec<Var>,
    latch_vars1: Vec<Var>,
    input_vars0: Vec<Var>,
    initial_bits: Vec<bool>,
    /// `blocked_cubes[k]` is the set of cubes currently blocked exactly
    /// at frame `k` (index 0 unused — nothing is ever blocked at frame 0).
    blocked_cubes: Vec<Vec<Cube>>,
    /// Cubes blocked at [`FRAME_INF`]: permanently inductive, not tied to
    /// any one frame's activation variable.
    blocked_forever: Vec<Cube>,
    config: PdrConfig,
}

impl<'a, N: NetworkOracle, S: SatSolver> PdrEngine<'a, N, S> {
    /// Build an engine for `network`, with `monitor` as the bad output,
    /// unrolling the transition relation once (depth 0 for the current
    /// state and the monitor's fan-in, depth 1 for the next-state latch
    /// values) and creating frame 0.
    pub fn new(
        network: &'a N,
        solver: &'a mut S,
        monitor: NetRef,
        config: PdrConfig,
    ) -> Result<Self, PdrError> {
        let mut encoder = TransitionRelationEncoder::new(network.net_size());
        encoder.add_bounded(network, solver, monitor.id, 0)?;
        for i in 0..network.input_size() {
            encoder.add_bounded(network, solver, network.get_input(i), 0)?;
        }
        // Depths must be materialized in order: every latch needs its own
        // depth-0 variable (and initial-state literal) before depth 1 can
        // be requested, even though nothing at depth 0 otherwise refers to
        // the monitor's fan-in reaching that latch.
        for i in 0..network.latch_size() {
            encoder.add_bounded(network, solver, network.get_latch(i), 0)?;
        }
        for i in 0..network.latch_size() {
            encoder.add_bounded(network, solver, network.get_latch(i), 1)?;
        }

        let latch_vars0: Vec<Var> = (0..network.latch_size())
            .map(|i| encoder.expect_var_at(network.get_latch(i), 0))
            .collect();
        let latch_vars1: Vec<Var> = (0..network.latch_size())
            .map(|i| encoder.expect_var_at(network.get_latch(i), 1))
            .collect();
        let input_vars0: Vec<Var> = (0..network.input_size())
            .map(|i| encoder.expect_var_at(network.get_input(i), 0))
            .collect();
        let initial_bits: Vec<bool> = encoder
            .initial_literals()
            .iter()
            .map(|l| !l.is_negated())
            .collect();

        let mut frames = FrameManager::new();
        frames.new_frame(solver, Some(encoder.initial_literals()));

        Ok(Self {
            network,
            solver,
            encoder,
            frames,
            sim: TernarySimulator::new(network.net_size()),
            dfs_order: network.dfs_order(),
            monitor,
            latch_vars0,
            latch_vars1,
            input_vars0,
            initial_bits,
            blocked_cubes: vec![Vec::new()],
            blocked_forever: Vec::new(),
            config,
        })
    }

    fn monitor_lit(&self) -> Lit {
        Lit::new(
            self.encoder.expect_var_at(self.monitor.id, 0),
            self.monitor.inverted,
        )
    }

    /// Query SAT for a state in `R_depth` with the monitor asserted.
    /// `None` on UNSAT (no bad state at this frame).
    fn get_bad_cube(&mut self, depth: usize) -> Option<Cube> {
        let mut assumptions = vec![self.monitor_lit()];
        assumptions.extend(self.frames.assume_frames(depth));
        if !self.solver.solve_assuming(&assumptions) {
            return None;
        }
        let model = self.read_latch_model();
        let inputs = self.read_input_model();
        Some(
            self.sim
                .generalize_bad_cube(self.network, &self.dfs_order, self.monitor, &inputs, &model),
        )
    }

    fn read_latch_model(&self) -> Cube {
        let bits: Vec<bool> = self
            .latch_vars0
            .iter()
            .map(|&v| self.solver.model_value(v).expect_bool())
            .collect();
        Cube::from_bits(&bits)
    }

    fn read_input_model(&self) -> Vec<Ternary> {
        self.input_vars0
            .iter()
            .map(|&v| Ternary::from_bool(self.solver.model_value(v).expect_bool()))
            .collect()
    }

    /// The relative-induction query.
    fn solve_relative(&mut self, s: &TCube, mode: RelativeMode) -> TCube {
        assert!(s.frame != 0, "solveRelative at frame 0 is a programmer error");

        let mut assumptions: Vec<Lit> = Vec::new();
        let mut origin: Vec<Option<Lit>> = vec![None; s.cube.width()];
        for (i, v) in s.cube.values().iter().enumerate() {
            if !v.is_dont_care() {
                let lit = Lit::new(self.latch_vars1[i], !v.bit());
                assumptions.push(lit);
                origin[i] = Some(lit);
            }
        }

        let mut tmp_act: Option<Var> = None;
        if mode == RelativeMode::ExtractModel {
            let t = self.solver.new_var();
            // "not s": at least one current-state literal disagrees with
            // `s`, i.e. the *negated* form of each conjunct in `s`.
            let mut clause: Vec<Lit> = s
                .cube
                .values()
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_dont_care())
                .map(|(i, v)| Lit::new(self.latch_vars0[i], v.bit()))
                .collect();
            clause.push(Lit::neg(t));
            self.solver.add_clause(&clause);
            assumptions.push(Lit::pos(t));
            tmp_act = Some(t);
        }

        #[allow(clippy::cast_sign_loss)]
        let k = (s.frame - 1) as usize;
        assumptions.extend(self.frames.assume_frames(k));

        let sat = self.solver.solve_assuming(&assumptions);

        if let Some(t) = tmp_act {
            self.solver.add_unit(Lit::neg(t));
        }

        if sat {
            match mode {
                RelativeMode::NoInduct => TCube::sat(Cube::all_x(0)),
                RelativeMode::ExtractModel => {
                    let model = self.read_latch_model();
                    let inputs = self.read_input_model();
                    let generalized = self.sim.generalize_predecessor(
                        self.network,
                        &self.dfs_order,
                        &inputs,
                        &model,
                    );
                    TCube::sat(generalized)
                }
            }
        } else {
            let core = self.solver.conflict().to_vec();
            let generalized = unsat_core_generalize(&s.cube, &origin, &core, &self.initial_bits);
            // Frame assumptions are asserted positively (`assume_frames`);
            // the lowest `i` whose `a_i` survives in the core is the
            // lowest frame the conflict actually needed, so the cube
            // generalizes to "inductive relative to R_i" and blocks at i+1.
            for i in k..self.frames.frame_count() {
                if core.contains(&Lit::pos(self.frames.act_var(i))) {
                    #[allow(clippy::cast_possible_wrap)]
                    return TCube::new(generalized, i as i64 + 1);
                }
            }
            TCube::inductive_forever(generalized)
        }
    }

    /// Add `g`'s blocking clause and bookkeep it by frame, lazily
    /// materializing frames up to `g.frame` if `solve_relative` returned a
    /// frame one beyond the current top (the generalized frame index can
    /// name a frame that does not exist yet; this engine treats "block at
    /// a not-yet-created frame" as "create it first", which is always a
    /// single-frame extension since the index never exceeds the current
    /// top by more than one).
    fn block_generalized(&mut self, g: TCube) {
        if g.frame != FRAME_INF {
            #[allow(clippy::cast_sign_loss)]
            let k = g.frame as usize;
            while self.frames.frame_count() <= k {
                self.frames.new_frame(self.solver, None);
                self.blocked_cubes.push(Vec::new());
            }
        }
        self.frames
            .block_cube_in_solver(self.solver, &self.latch_vars0, &g);
        if g.frame == FRAME_INF {
            self.blocked_forever.push(g.cube);
        } else {
            #[allow(clippy::cast_sign_loss)]
            let k = g.frame as usize;
            self.blocked_cubes[k].push(g.cube);
        }
    }

    /// Process obligations from lowest frame up until the queue empties
    /// (frame extension needed) or a frame-0 obligation yields a
    /// counterexample.
    fn inner_loop(&mut self, queue: &mut ObligationQueue, trace: &mut PdrTrace) -> Option<Vec<Cube>> {
        while let Some(node) = queue.pop() {
            let s = node.cube.clone();
            if s.frame == 0 {
                return Some(node.trace());
            }

            let result = self.solve_relative(&s, RelativeMode::ExtractModel);
            if result.is_null_frame() {
                let predecessor =
                    ObligationNode::child(TCube::new(result.cube, s.frame - 1), node.clone());
                queue.push(predecessor);
                queue.push(node);
            } else {
                let gframe = result.frame;
                trace.push(PdrEvent::ObligationBlocked { frame: gframe });
                self.block_generalized(result);
                if gframe != FRAME_INF {
                    #[allow(clippy::cast_sign_loss)]
                    let gframe_usize = gframe as usize;
                    if gframe_usize < self.frames.top() {
                        let requeued = match &node.parent {
                            Some(parent) => {
                                ObligationNode::child(TCube::new(s.cube, gframe + 1), parent.clone())
                            }
                            None => ObligationNode::root(TCube::new(s.cube, gframe + 1)),
                        };
                        queue.push(requeued);
                    }
                }
            }
        }
        None
    }

    /// Allocate a new frame and push every cube blocked at an earlier
    /// frame forward through it when it is no longer reachable there.
    /// Returns `Some(k)` if frame `k` and `k+1` coincide (the property is
    /// proved).
    fn extend_and_propagate(&mut self) -> Option<usize> {
        let new_top = self.frames.new_frame(self.solver, None);
        self.blocked_cubes.push(Vec::new());

        for k in 1..new_top {
            let cubes = std::mem::take(&mut self.blocked_cubes[k]);
            let mut remaining = Vec::new();
            for c in cubes {
                #[allow(clippy::cast_possible_wrap)]
                let probe = TCube::new(c.clone(), (k + 1) as i64);
                let result = self.solve_relative(&probe, RelativeMode::NoInduct);
                if result.is_null_frame() {
                    remaining.push(c);
                } else {
                    self.frames
                        .block_cube_in_solver(self.solver, &self.latch_vars0, &probe);
                    self.blocked_cubes[k + 1].push(c);
                }
            }
            self.blocked_cubes[k] = remaining;
        }

        for k in 1..new_top {
            if same_cube_set(&self.blocked_cubes[k], &self.blocked_cubes[k + 1]) {
                return Some(k);
            }
        }
        None
    }

    /// Run the PDR loop to completion.
    pub fn run(&mut self) -> Result<(PdrOutcome, PdrTrace), PdrError> {
        let mut trace = PdrTrace::new();
        loop {
            if self.frames.frame_count() > self.config.max_frames {
                return Err(PdrError::FrameBudgetExhausted {
                    max_frames: self.config.max_frames,
                });
            }

            let top = self.frames.top();
            // Drain every bad cube at this frame before advancing: blocking
            // one witness can leave another, non-subsuming witness for the
            // same monitor still satisfiable at `top` (e.g. a disjunctive
            // monitor whose two disjuncts aren't generalizations of each
            // other), and that witness must be found and blocked too.
            while let Some(bad_cube) = self.get_bad_cube(top) {
                trace.push(PdrEvent::BadCubeExtracted { frame: top });
                #[allow(clippy::cast_possible_wrap)]
                let root = ObligationNode::root(TCube::new(bad_cube, top as i64));
                let mut queue = ObligationQueue::new();
                queue.push(root);
                if let Some(cex) = self.inner_loop(&mut queue, &mut trace) {
                    trace.push(PdrEvent::CounterexampleFound {
                        length: cex.len().saturating_sub(1),
                    });
                    return Ok((PdrOutcome::Counterexample { trace: cex }, trace));
                }
            }
            trace.push(PdrEvent::NoBadStateAtFrame { frame: top });

            let proved = self.extend_and_propagate();
            trace.push(PdrEvent::FrameExtended {
                frame: self.frames.top(),
            });
            if let Some(proved_at_frame) = proved {
                trace.push(PdrEvent::PropertyProved { frame: proved_at_frame });
                return Ok((PdrOutcome::Safe { proved_at_frame }, trace));
            }
        }
    }
}

/// Weaken every non-X slot whose recorded `s'` assumption literal does
/// not appear in the UNSAT core (in either polarity); fall back to the
/// ungeneralized cube if the result would intersect the initial states.
fn unsat_core_generalize(
    s: &Cube,
    origin: &[Option<Lit>],
    core: &[Lit],
    initial: &[bool],
) -> Cube {
    let mut generalized = s.clone();
    for i in 0..s.width() {
        if let Some(lit) = origin[i] {
            let essential = core.contains(&lit) || core.contains(&lit.negate());
            if !essential {
                generalized.weaken(i);
            }
        }
    }
    if generalized.intersects_initial(initial) {
        s.clone()
    } else {
        generalized
    }
}

fn same_cube_set(a: &[Cube], b: &[Cube]) -> bool {
    a.len() == b.len() && a.iter().all(|c| b.contains(c))
}
