/*!
Deterministic automata built lazily from expression derivatives.

The states of an [`Automaton`] are expressions. Construction starts from the
expression itself and explores breadth first: for each state it computes the
character classes, takes the derivative at the low bound of each class and
records the class as a transition to that derivative. Interning and
simplification make the set of distinct derivatives finite in practice, and
the classes of every state partition the whole alphabet, so the result is
complete and deterministic. It is not minimal.

A state is final exactly when its expression is nullable.

```
use regex_deriv::{automaton::Builder, Pool};

let pool = Pool::new();
let ab = pool.concat(pool.char('a'), pool.char('b'));
let dfa = Builder::new().build(&pool, pool.star(ab))?;
assert!(dfa.is_match("abab".chars()));
assert!(!dfa.is_match("aba".chars()));
# Ok::<(), regex_deriv::Error>(())
```
*/

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::interval::Interval;
use crate::pool::Pool;

/// A set of automaton states, ordered by expression identifier.
pub type StateSet = BTreeSet<Expr>;

/// The algorithm used to advance one step of automaton composition.
///
/// Both produce the same successor pairs; they differ only in cost.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ProductStrategy {
    /// Intersect each transition of the second automaton with every
    /// combination of transitions of the tracked states. The cost is the
    /// product of the tracked states' fan-outs.
    CrossProduct,
    /// Sort all transitions by their low bound and sweep once over the
    /// alphabet, emitting one successor per elementary interval.
    #[default]
    AtomicSweep,
}

/// The configuration used for building an automaton.
#[derive(Clone, Debug, Default)]
pub struct Config {
    state_limit: Option<Option<usize>>,
    product_strategy: Option<ProductStrategy>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the maximum number of states construction may discover before
    /// giving up with [`Error::TooManyStates`].
    ///
    /// By default there is no limit. Derivative construction can produce a
    /// number of states exponential in the size of the expression, so
    /// callers building automata from untrusted expressions should set one.
    pub fn state_limit(mut self, limit: Option<usize>) -> Config {
        self.state_limit = Some(limit);
        self
    }

    /// Set the algorithm [`Automaton::compose`] uses.
    ///
    /// The default is [`ProductStrategy::AtomicSweep`].
    pub fn product_strategy(mut self, strategy: ProductStrategy) -> Config {
        self.product_strategy = Some(strategy);
        self
    }

    /// Returns the state limit, if one was set.
    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit.unwrap_or(None)
    }

    /// Returns the product strategy.
    pub fn get_product_strategy(&self) -> ProductStrategy {
        self.product_strategy.unwrap_or_default()
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(&self, o: Config) -> Config {
        Config {
            state_limit: o.state_limit.or(self.state_limit),
            product_strategy: o.product_strategy.or(self.product_strategy),
        }
    }
}

/// A builder for automata over expressions of a [`Pool`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Builder {
        Builder { config: Config::default() }
    }

    /// Apply the given configuration options to this builder.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Build the automaton recognizing `expr`.
    ///
    /// # Errors
    ///
    /// When a state limit is configured and construction discovers more
    /// states than it allows.
    ///
    /// # Panics
    ///
    /// When `expr` contains an anchor. Run
    /// [`Pool::remove_anchors`] first.
    pub fn build(&self, pool: &Pool, expr: Expr) -> Result<Automaton> {
        self.explore(pool, expr, self.config.get_state_limit())
    }

    /// Build the automaton recognizing `expr`, ignoring any state limit.
    pub(crate) fn build_unbounded(&self, pool: &Pool, expr: Expr) -> Automaton {
        match self.explore(pool, expr, None) {
            Ok(automaton) => automaton,
            Err(err) => unreachable!("construction without a state limit failed: {}", err),
        }
    }

    fn explore(&self, pool: &Pool, expr: Expr, limit: Option<usize>) -> Result<Automaton> {
        let check = |discovered: usize| match limit {
            Some(limit) if discovered > limit => Err(Error::TooManyStates { limit }),
            _ => Ok(()),
        };
        check(1)?;

        let mut states = vec![expr];
        let mut finals = HashSet::new();
        let mut transitions = HashMap::new();
        let mut seen = HashSet::from([expr]);
        let mut queue = VecDeque::from([expr]);
        while let Some(state) = queue.pop_front() {
            let classes = pool.character_classes(state);
            let mut edges = Vec::with_capacity(classes.len());
            for class in classes {
                let target = pool.derivative(state, class.low());
                edges.push((class, target));
                if seen.insert(target) {
                    check(states.len() + 1)?;
                    states.push(target);
                    queue.push_back(target);
                }
            }
            trace!("state {:?}: {} transitions", state, edges.len());
            if pool.is_nullable(state) {
                finals.insert(state);
            }
            transitions.insert(state, edges);
        }
        debug!(
            "built automaton for {:?}: {} states, {} final",
            expr,
            states.len(),
            finals.len()
        );
        Ok(Automaton {
            initial: expr,
            states,
            finals,
            transitions,
            strategy: self.config.get_product_strategy(),
        })
    }
}

/// A complete deterministic automaton whose states are expressions.
///
/// Automata are immutable once built and can be shared between threads.
#[derive(Clone, Debug)]
pub struct Automaton {
    initial: Expr,
    states: Vec<Expr>,
    finals: HashSet<Expr>,
    /// Outgoing transitions of every state. The intervals of one state are
    /// sorted and partition the alphabet.
    transitions: HashMap<Expr, Vec<(Interval, Expr)>>,
    strategy: ProductStrategy,
}

impl Automaton {
    /// The initial state: the expression the automaton was built from.
    pub fn initial_state(&self) -> Expr {
        self.initial
    }

    /// Every state, in the order construction discovered them.
    pub fn states(&self) -> &[Expr] {
        &self.states
    }

    /// The accepting states.
    pub fn final_states(&self) -> &HashSet<Expr> {
        &self.finals
    }

    /// Whether `state` is accepting.
    pub fn is_final(&self, state: Expr) -> bool {
        self.finals.contains(&state)
    }

    /// The strategy [`Automaton::compose`] uses.
    pub fn product_strategy(&self) -> ProductStrategy {
        self.strategy
    }

    /// The outgoing transitions of `state`, sorted by interval.
    ///
    /// # Panics
    ///
    /// When `state` is not a state of this automaton.
    pub fn transitions(&self, state: Expr) -> &[(Interval, Expr)] {
        match self.transitions.get(&state) {
            Some(edges) => edges,
            None => panic!("{:?} is not a state of this automaton", state),
        }
    }

    /// Whether the automaton accepts `symbols`.
    pub fn is_match<I>(&self, symbols: I) -> bool
    where
        I: IntoIterator<Item = char>,
    {
        let last = symbols.into_iter().fold(self.initial, |state, c| self.move_state(state, c));
        self.is_final(last)
    }

    /// The state reached from `state` on `symbol`.
    ///
    /// # Panics
    ///
    /// When `state` is not a state of this automaton.
    pub fn move_state(&self, state: Expr, symbol: char) -> Expr {
        match self.transitions(state).iter().find(|(range, _)| range.contains(symbol)) {
            Some(&(_, target)) => target,
            None => panic!("no transition of {:?} covers {:?}", state, symbol),
        }
    }

    /// The states reached from any of `states` on `symbol`.
    pub fn move_states(&self, states: &StateSet, symbol: char) -> StateSet {
        states.iter().map(|&state| self.move_state(state, symbol)).collect()
    }

    /// The states of this automaton reachable from `states` by reading,
    /// in lockstep, a non-empty string that `other` accepts.
    ///
    /// The search runs over pairs of one state of `other` and a set of
    /// tracked states of `self`, starting from the initial state of `other`
    /// paired with `states`. Every time a step lands `other` in an accepting
    /// state, the tracked states of that step join the result.
    pub fn compose(&self, states: &StateSet, other: &Automaton) -> StateSet {
        let mut result = StateSet::new();
        let start = (other.initial_state(), states.clone());
        let mut seen = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start]);
        while let Some((b_state, tracked)) = queue.pop_front() {
            for pair in self.successors(self.strategy, other, b_state, &tracked) {
                if other.is_final(pair.0) {
                    result.extend(pair.1.iter().copied());
                }
                if seen.insert(pair.clone()) {
                    queue.push_back(pair);
                }
            }
        }
        debug!(
            "composed {} tracked states through {} pairs into {} states",
            states.len(),
            seen.len(),
            result.len()
        );
        result
    }

    /// One step of [`Automaton::compose`]: every pair of a successor of
    /// `b_state` in `other` and the set of successors of `tracked` in `self`
    /// on the same symbol.
    ///
    /// # Panics
    ///
    /// When `b_state` is not a state of `other`, or a member of `tracked` is
    /// not a state of `self`.
    pub fn successors(
        &self,
        strategy: ProductStrategy,
        other: &Automaton,
        b_state: Expr,
        tracked: &StateSet,
    ) -> BTreeSet<(Expr, StateSet)> {
        match strategy {
            ProductStrategy::CrossProduct => {
                crate::product::cross_product(self, other, b_state, tracked)
            }
            ProductStrategy::AtomicSweep => {
                crate::product::atomic_sweep(self, other, b_state, tracked)
            }
        }
    }

    /// Whether the automaton accepts no string at all.
    pub fn is_empty(&self) -> bool {
        if self.finals.is_empty() {
            return true;
        }
        let mut seen = HashSet::from([self.initial]);
        let mut queue = VecDeque::from([self.initial]);
        while let Some(state) = queue.pop_front() {
            if self.is_final(state) {
                return false;
            }
            for &(_, target) in self.transitions(state) {
                if seen.insert(target) {
                    queue.push_back(target);
                }
            }
        }
        true
    }
}
