//! Seeded scenario runner.
//!
//! Generates a reproducible operation sequence from a seed and drives the
//! model and the real network in lockstep. Each step's results and the final
//! observable states must agree; an optional oracle then checks any extra
//! property over the finished run.
//!
//! ```text
//! seed ─► ChaCha8Rng ─► Operation ─┬─► ModelWorld ─┐
//!                                  └─► RealWorld  ─┴─► compare
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    model::{
        ModelPostKind, ModelWorld, ObservableState, Operation, OperationResult, SmallText,
    },
    real::RealWorld,
};

/// Default number of users.
pub const DEFAULT_USERS: u8 = 4;

/// Default number of generated operations.
pub const DEFAULT_STEPS: usize = 64;

/// Property checked over a finished run.
pub type Oracle = Box<dyn Fn(&ScenarioOutcome) -> Result<(), String>>;

/// Why a scenario failed.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Harness users could not be registered.
    #[error("setup failed: {0}")]
    Setup(#[from] flock_core::NetworkError),

    /// Model and network disagreed on an operation's result.
    #[error("step {step}: {op:?} gave {real:?}, model expected {model:?}")]
    ResultDivergence {
        /// Zero-based step index.
        step: usize,
        /// Offending operation.
        op: Operation,
        /// Model result.
        model: OperationResult,
        /// Network result.
        real: OperationResult,
    },

    /// Results agreed but the observable states did not.
    #[error("step {step}: observable state diverged after {op:?}")]
    StateDivergence {
        /// Zero-based step index.
        step: usize,
        /// Last applied operation.
        op: Operation,
    },

    /// The oracle rejected the run.
    #[error("oracle: {0}")]
    Oracle(String),
}

/// A finished, agreeing run.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Applied operations with their results.
    pub trace: Vec<(Operation, OperationResult)>,
    /// Final observable state (identical for model and network).
    pub state: ObservableState,
}

impl ScenarioOutcome {
    /// Number of operations that succeeded.
    pub fn successes(&self) -> usize {
        self.trace.iter().filter(|(_, result)| result.is_ok()).count()
    }
}

/// Builder for a seeded run.
pub struct Scenario {
    seed: u64,
    users: u8,
    steps: usize,
    oracle: Option<Oracle>,
}

impl Scenario {
    /// Scenario with seed 0 and default sizes.
    pub fn new() -> Self {
        Self { seed: 0, users: DEFAULT_USERS, steps: DEFAULT_STEPS, oracle: None }
    }

    /// RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of registered users (at least one).
    #[must_use]
    pub fn with_users(mut self, users: u8) -> Self {
        self.users = users.max(1);
        self
    }

    /// Number of generated operations.
    #[must_use]
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Property to check once the run completes.
    #[must_use]
    pub fn oracle(mut self, oracle: Oracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Operations this scenario will apply, without applying them.
    pub fn operations(&self) -> Vec<Operation> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut posts: u8 = 0;

        (0..self.steps)
            .map(|_| {
                let op = random_operation(&mut rng, self.users, posts);
                if matches!(op, Operation::Publish { kind, .. } if kind != ModelPostKind::Unknown) {
                    posts = posts.saturating_add(1);
                }
                op
            })
            .collect()
    }

    /// Run the scenario.
    ///
    /// # Errors
    ///
    /// Returns the first divergence between model and network, or the
    /// oracle's rejection.
    pub fn run(self) -> Result<ScenarioOutcome, ScenarioError> {
        let mut model = ModelWorld::new(self.users);
        let mut real = RealWorld::new(self.users)?;
        let mut trace = Vec::with_capacity(self.steps);

        tracing::debug!(seed = self.seed, users = self.users, steps = self.steps, "scenario start");

        for (step, op) in self.operations().into_iter().enumerate() {
            let expected = model.apply(&op);
            let actual = real.apply(&op);

            if expected != actual {
                return Err(ScenarioError::ResultDivergence {
                    step,
                    op,
                    model: expected,
                    real: actual,
                });
            }
            if model.observable_state() != real.observable_state() {
                return Err(ScenarioError::StateDivergence { step, op });
            }

            trace.push((op, actual));
        }

        let outcome = ScenarioOutcome { trace, state: real.observable_state() };
        if let Some(oracle) = &self.oracle {
            oracle(&outcome).map_err(ScenarioError::Oracle)?;
        }

        Ok(outcome)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw one operation.
///
/// `posts` is an upper bound; picks past the real count exercise the
/// unknown-post path.
fn random_operation(rng: &mut ChaCha8Rng, users: u8, posts: u8) -> Operation {
    match rng.gen_range(0..20u8) {
        0 => Operation::LogIn { user: pick(rng, users), correct_credential: rng.gen_bool(0.8) },
        1 => Operation::LogOut { user: pick(rng, users) },
        2..=5 => Operation::Follow { follower: pick(rng, users), followee: pick(rng, users) },
        6 => Operation::Unfollow { follower: pick(rng, users), followee: pick(rng, users) },
        7..=9 => {
            let kind = match rng.gen_range(0..8u8) {
                0..=2 => ModelPostKind::Text,
                3 | 4 => ModelPostKind::Image,
                5 | 6 => ModelPostKind::Sale { price: rng.gen_range(0..1000) },
                _ => ModelPostKind::Unknown,
            };
            Operation::Publish { user: pick(rng, users), kind }
        },
        10..=12 => Operation::Like { user: pick(rng, users), post: pick(rng, posts) },
        13 | 14 => Operation::Comment {
            user: pick(rng, users),
            post: pick(rng, posts),
            body: SmallText { seed: rng.gen_range(0..=255), size_class: rng.gen_range(0..4) },
        },
        15 => Operation::MarkSold { post: pick(rng, posts), correct_credential: rng.gen_bool(0.8) },
        16 | 17 => Operation::Discount {
            post: pick(rng, posts),
            percent: rng.gen_range(0..=100),
            correct_credential: rng.gen_bool(0.8),
        },
        _ => Operation::Drain { user: pick(rng, users) },
    }
}

/// Index below `bound`, or `bound` itself about one time in sixteen.
fn pick(rng: &mut ChaCha8Rng, bound: u8) -> u8 {
    if bound == 0 || rng.gen_bool(1.0 / 16.0) { bound } else { rng.gen_range(0..bound) }
}
