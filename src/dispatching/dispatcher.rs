//! Dispatch loop.
//!
//! # Algorithm
//!
//! 1. Queue every job that still has operations, in job order.
//! 2. Candidates = queued jobs whose current operation is feasible.
//! 3. No candidates → Stalled.
//! 4. Pick one candidate: uniformly at random for RANDOM, otherwise the
//!    best key under the rule's order. Ties keep queue order.
//! 5. Commit its current operation; makespan = max(makespan, end).
//! 6. Drop the job from the queue once it has no operations left.
//! 7. Empty queue → Finished.
//!
//! # Complexity
//! O(r * n) where r = total operations (one commit per round) and n = jobs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::{Rule, RuleScore};
use crate::error::{Result, ShopError};
use crate::models::{Job, ShopState, Violation};

/// Lifecycle of a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    /// No run started yet.
    #[default]
    Idle,
    /// Jobs with unfinished operations remain.
    Running,
    /// Every job is fully scheduled.
    Finished,
    /// Jobs remain but none can be committed.
    Stalled { jobs_remaining: usize },
}

/// Makespan as known by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Makespan {
    /// The run finished; this is the schedule's makespan.
    Complete(u64),
    /// The run has not finished (idle, running or stalled); not authoritative.
    Partial(u64),
}

impl Makespan {
    /// The raw value regardless of completeness.
    pub fn value(&self) -> u64 {
        match *self {
            Makespan::Complete(v) | Makespan::Partial(v) => v,
        }
    }

    /// Whether the value comes from a finished run.
    pub fn is_complete(&self) -> bool {
        matches!(self, Makespan::Complete(_))
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Rule used.
    pub rule: Rule,
    /// Completion time of the last operation.
    pub makespan: u64,
    /// Number of rounds, one committed operation each.
    pub rounds: usize,
}

/// Greedy job-shop dispatcher driven by a single [`Rule`].
///
/// # Example
/// ```
/// use u_jobshop::dispatching::{Dispatcher, Rule};
///
/// let dispatcher = Dispatcher::new(Rule::Random).with_seed(42);
/// assert_eq!(dispatcher.rule(), Rule::Random);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    rule: Rule,
    seed: u64,
    state: DispatchState,
    makespan: u64,
    rounds: usize,
}

impl Dispatcher {
    /// Creates a dispatcher for a rule (seed 0).
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            seed: 0,
            state: DispatchState::Idle,
            makespan: 0,
            rounds: 0,
        }
    }

    /// Sets the seed used by [`Dispatcher::run`] for the random rule.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Active rule.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Configured seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Rounds completed in the current or last run.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Accumulated makespan; complete only after a finished run.
    pub fn makespan(&self) -> Makespan {
        match self.state {
            DispatchState::Finished => Makespan::Complete(self.makespan),
            _ => Makespan::Partial(self.makespan),
        }
    }

    /// Runs the rule to completion with a generator seeded from the
    /// configured seed. Repeated runs with one seed are identical.
    ///
    /// The shop must be fresh or [`ShopState::reset`]; state left over from
    /// an earlier run is carried into this one.
    pub fn run(&mut self, shop: &mut ShopState) -> Result<DispatchReport> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.run_with_rng(shop, &mut rng)
    }

    /// Runs the rule to completion using a caller-owned generator.
    ///
    /// Only the random rule draws from `rng`.
    ///
    /// # Errors
    /// [`ShopError::DispatchStalled`] when jobs remain but none is feasible;
    /// [`Dispatcher::makespan`] then reports the partial value.
    pub fn run_with_rng<R: Rng>(
        &mut self,
        shop: &mut ShopState,
        rng: &mut R,
    ) -> Result<DispatchReport> {
        if shop.machines().iter().any(|m| !m.log().is_empty()) {
            warn!(
                instance = shop.name(),
                rule = self.rule.name(),
                "shop was not reset; dispatching on top of a previous run"
            );
        }

        self.state = DispatchState::Running;
        self.makespan = 0;
        self.rounds = 0;

        let mut queue: Vec<usize> = shop
            .jobs()
            .iter()
            .filter(|j| j.has_remaining())
            .map(|j| j.id)
            .collect();

        while !queue.is_empty() {
            let candidates: Vec<usize> = queue
                .iter()
                .copied()
                .filter(|&job_id| shop.is_job_feasible(job_id))
                .collect();

            if candidates.is_empty() {
                return Err(self.stall(shop, queue.len(), "no feasible job"));
            }

            let chosen = self.select(&candidates, shop, rng);
            let end_time = self.commit_chosen(shop, chosen, queue.len())?;
            self.makespan = self.makespan.max(end_time);
            self.rounds += 1;
            debug!(
                rule = self.rule.name(),
                round = self.rounds,
                job = chosen,
                candidates = candidates.len(),
                end = end_time,
                "dispatched"
            );

            if !shop.job(chosen).is_some_and(Job::has_remaining) {
                queue.retain(|&job_id| job_id != chosen);
            }
        }

        self.state = DispatchState::Finished;
        info!(
            instance = shop.name(),
            rule = self.rule.name(),
            makespan = self.makespan,
            rounds = self.rounds,
            "dispatch finished"
        );

        Ok(DispatchReport {
            rule: self.rule,
            makespan: self.makespan,
            rounds: self.rounds,
        })
    }

    /// Checks the shop's schedule for machine overlaps and order violations.
    pub fn verify(&self, shop: &ShopState) -> std::result::Result<(), Violation> {
        shop.verify()
    }

    /// Commits the current operation of the chosen job.
    ///
    /// A chosen job with nothing to commit ends the run as stalled.
    fn commit_chosen(
        &mut self,
        shop: &mut ShopState,
        job_id: usize,
        jobs_remaining: usize,
    ) -> Result<u64> {
        match shop.commit(job_id) {
            Some(end_time) => Ok(end_time),
            None => Err(self.stall(
                shop,
                jobs_remaining,
                "chosen job has no operation to commit",
            )),
        }
    }

    /// Moves to `Stalled` and builds the error carrying the partial makespan.
    fn stall(&mut self, shop: &ShopState, jobs_remaining: usize, reason: &str) -> ShopError {
        self.state = DispatchState::Stalled { jobs_remaining };
        warn!(
            instance = shop.name(),
            rule = self.rule.name(),
            jobs_remaining,
            partial_makespan = self.makespan,
            reason,
            "dispatch stalled"
        );
        ShopError::DispatchStalled {
            jobs_remaining,
            partial_makespan: self.makespan,
        }
    }

    /// Picks one job among non-empty `candidates`.
    fn select<R: Rng>(&self, candidates: &[usize], shop: &ShopState, rng: &mut R) -> usize {
        if self.rule == Rule::Random {
            return candidates[rng.random_range(0..candidates.len())];
        }

        let key = |job_id: usize| -> RuleScore {
            shop.job(job_id)
                .and_then(|job| self.rule.evaluate(job, shop))
                .unwrap_or(0.0)
        };

        let mut best = candidates[0];
        let mut best_key = key(best);
        for &job_id in &candidates[1..] {
            let k = key(job_id);
            if self.rule.prefers(k, best_key) {
                best = job_id;
                best_key = k;
            }
        }
        best
    }
}

/// Runs each rule on the shop, resetting it before every run.
///
/// The shop is left holding the schedule of the last rule.
pub fn run_all(
    shop: &mut ShopState,
    rules: &[Rule],
    seed: u64,
) -> Vec<(Rule, Result<DispatchReport>)> {
    rules
        .iter()
        .map(|&rule| {
            shop.reset();
            let outcome = Dispatcher::new(rule).with_seed(seed).run(shop);
            (rule, outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Instance, TaillardGenerator};
    use crate::models::Schedule;

    fn two_by_two() -> ShopState {
        ShopState::new(&Instance::new(
            "two_by_two",
            2,
            2,
            vec![vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]],
        ))
        .unwrap()
    }

    fn intervals(shop: &ShopState) -> Vec<Vec<Option<(u64, u64)>>> {
        shop.jobs()
            .iter()
            .map(|j| j.operations().iter().map(|op| op.interval()).collect())
            .collect()
    }

    fn generated(jobs: usize, machines: usize) -> ShopState {
        let instance = TaillardGenerator::new(jobs, machines, 840_612_802, 398_197_754)
            .generate("generated");
        ShopState::new(&instance).unwrap()
    }

    #[test]
    fn test_fifo_two_by_two() {
        let mut shop = two_by_two();
        let mut dispatcher = Dispatcher::new(Rule::Fifo);

        let report = dispatcher.run(&mut shop).unwrap();

        // Round 1: tie at 0 → J0. Round 2: J1 (0) before J0 (3).
        // Round 3: J1 (2) before J0 (3); J1 O1 starts at max(2, 3) = 3.
        assert_eq!(
            intervals(&shop),
            vec![
                vec![Some((0, 3)), Some((3, 5))],
                vec![Some((0, 2)), Some((3, 7))],
            ]
        );
        assert_eq!(report.makespan, 7);
        assert_eq!(report.rounds, 4);
        assert_eq!(dispatcher.state(), DispatchState::Finished);
        assert_eq!(dispatcher.makespan(), Makespan::Complete(7));
        assert!(dispatcher.verify(&shop).is_ok());
    }

    #[test]
    fn test_lifo_two_by_two() {
        let mut shop = two_by_two();
        let report = Dispatcher::new(Rule::Lifo).run(&mut shop).unwrap();
        assert_eq!(
            intervals(&shop),
            vec![
                vec![Some((0, 3)), Some((3, 5))],
                vec![Some((5, 7)), Some((7, 11))],
            ]
        );
        assert_eq!(report.makespan, 11);
    }

    #[test]
    fn test_mwkr_two_by_two() {
        let mut shop = two_by_two();
        let report = Dispatcher::new(Rule::Mwkr).run(&mut shop).unwrap();
        assert_eq!(
            intervals(&shop),
            vec![
                vec![Some((0, 3)), Some((3, 5))],
                vec![Some((0, 2)), Some((3, 7))],
            ]
        );
        assert_eq!(report.makespan, 7);
    }

    #[test]
    fn test_lwkr_two_by_two() {
        let mut shop = two_by_two();
        let report = Dispatcher::new(Rule::Lwkr).run(&mut shop).unwrap();
        assert_eq!(
            intervals(&shop),
            vec![
                vec![Some((0, 3)), Some((3, 5))],
                vec![Some((5, 7)), Some((7, 11))],
            ]
        );
        assert_eq!(report.makespan, 11);
    }

    #[test]
    fn test_ties_keep_job_order() {
        // Three single-operation jobs on one machine: every key ties.
        let instance = Instance::new("ties", 3, 1, vec![vec![(0, 2)], vec![(0, 3)], vec![(0, 4)]]);
        for rule in [Rule::Fifo, Rule::Lifo, Rule::Mwkr, Rule::Lwkr] {
            let mut shop = ShopState::new(&instance).unwrap();
            Dispatcher::new(rule).run(&mut shop).unwrap();
            let order: Vec<usize> = shop.machines()[0]
                .log()
                .iter()
                .map(|s| s.job_id)
                .collect();
            assert_eq!(order, vec![0, 1, 2], "rule {rule}");
        }
    }

    #[test]
    fn test_single_operation_every_rule() {
        let instance = Instance::new("single", 1, 1, vec![vec![(0, 9)]]);
        for rule in Rule::ALL {
            let mut shop = ShopState::new(&instance).unwrap();
            let report = Dispatcher::new(rule).run(&mut shop).unwrap();
            assert_eq!(report.makespan, 9, "rule {rule}");
            assert_eq!(report.rounds, 1);
        }
    }

    #[test]
    fn test_every_rule_produces_valid_schedule() {
        let mut shop = generated(6, 4);
        let total_ops = shop.instance().total_operations();

        for (rule, outcome) in run_all(&mut shop.clone(), &Rule::ALL, 11) {
            let report = outcome.unwrap();
            assert_eq!(report.rounds, total_ops, "rule {rule}");
        }

        for rule in Rule::ALL {
            shop.reset();
            let report = Dispatcher::new(rule).with_seed(5).run(&mut shop).unwrap();
            assert!(shop.is_complete());
            assert!(shop.verify().is_ok(), "rule {rule}");
            assert_eq!(report.makespan, shop.schedule().makespan());
            assert_eq!(report.makespan, shop.completion_time());
            assert!(report.makespan >= shop.instance().lower_bound());
        }
    }

    #[test]
    fn test_reset_then_rerun_is_identical() {
        let mut shop = generated(5, 5);
        for rule in [Rule::Fifo, Rule::Lifo, Rule::Mwkr, Rule::Lwkr] {
            shop.reset();
            Dispatcher::new(rule).run(&mut shop).unwrap();
            let first: Schedule = shop.schedule();

            shop.reset();
            Dispatcher::new(rule).run(&mut shop).unwrap();
            assert_eq!(shop.schedule(), first, "rule {rule}");
        }
    }

    #[test]
    fn test_random_seed_reproducible() {
        let mut shop = generated(8, 5);
        let mut dispatcher = Dispatcher::new(Rule::Random).with_seed(2024);

        dispatcher.run(&mut shop).unwrap();
        let first = shop.schedule();
        shop.reset();
        dispatcher.run(&mut shop).unwrap();
        assert_eq!(shop.schedule(), first);

        shop.reset();
        let mut rng_a = StdRng::seed_from_u64(77);
        let mut rng_b = StdRng::seed_from_u64(77);
        Dispatcher::new(Rule::Random)
            .run_with_rng(&mut shop, &mut rng_a)
            .unwrap();
        let from_a = shop.schedule();
        shop.reset();
        Dispatcher::new(Rule::Random)
            .run_with_rng(&mut shop, &mut rng_b)
            .unwrap();
        assert_eq!(shop.schedule(), from_a);
        assert!(shop.verify().is_ok());
    }

    #[test]
    fn test_stalled_is_reported() {
        let mut shop = two_by_two();
        // J0 claims its first operation is done without scheduling it.
        shop.job_mut(0).unwrap().force_cursor(1);

        let mut dispatcher = Dispatcher::new(Rule::Fifo);
        let err = dispatcher.run(&mut shop).unwrap_err();

        match err {
            ShopError::DispatchStalled {
                jobs_remaining,
                partial_makespan,
            } => {
                assert_eq!(jobs_remaining, 1);
                // J1 runs alone: [0,2) on M1, then [2,6) on M0.
                assert_eq!(partial_makespan, 6);
            }
            other => panic!("expected DispatchStalled, got {other:?}"),
        }
        assert_eq!(
            dispatcher.state(),
            DispatchState::Stalled { jobs_remaining: 1 }
        );
        assert_eq!(dispatcher.makespan(), Makespan::Partial(6));
        assert!(!dispatcher.makespan().is_complete());
        assert_eq!(dispatcher.rounds(), 2);
    }

    #[test]
    fn test_commit_without_operation_stalls() {
        let mut shop = two_by_two();
        let mut dispatcher = Dispatcher::new(Rule::Fifo);
        dispatcher.run(&mut shop).unwrap();

        // J0 is finished, so committing it again has nothing to place.
        let err = dispatcher.commit_chosen(&mut shop, 0, 1).unwrap_err();
        match err {
            ShopError::DispatchStalled {
                jobs_remaining,
                partial_makespan,
            } => {
                assert_eq!(jobs_remaining, 1);
                assert_eq!(partial_makespan, 7);
            }
            other => panic!("expected DispatchStalled, got {other:?}"),
        }
        assert_eq!(
            dispatcher.state(),
            DispatchState::Stalled { jobs_remaining: 1 }
        );
        assert_eq!(dispatcher.makespan(), Makespan::Partial(7));
        assert_eq!(shop.completion_time(), 7);
    }

    #[test]
    fn test_idle_dispatcher() {
        let dispatcher = Dispatcher::new(Rule::Lwkr).with_seed(3);
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        assert_eq!(dispatcher.makespan(), Makespan::Partial(0));
        assert_eq!(dispatcher.seed(), 3);
        assert_eq!(dispatcher.rounds(), 0);
    }

    #[test]
    fn test_run_all_resets_between_rules() {
        let mut shop = two_by_two();
        let results = run_all(&mut shop, &[Rule::Fifo, Rule::Lifo, Rule::Fifo], 0);
        let makespans: Vec<u64> = results
            .into_iter()
            .map(|(_, r)| r.unwrap().makespan)
            .collect();
        assert_eq!(makespans, vec![7, 11, 7]);
    }

    #[test]
    fn test_without_reset_state_carries_over() {
        let mut shop = two_by_two();
        Dispatcher::new(Rule::Fifo).run(&mut shop).unwrap();
        // Every job already finished: nothing left to dispatch.
        let report = Dispatcher::new(Rule::Lifo).run(&mut shop).unwrap();
        assert_eq!(report.rounds, 0);
        assert_eq!(report.makespan, 0);
    }
}
