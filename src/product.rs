/*!
One step of automaton composition.

Given a state `b_state` of an automaton B and a set of tracked states of an
automaton A, a step produces every pair `(b_target, a_targets)` such that some
symbol takes `b_state` to `b_target` and takes the tracked states to exactly
`a_targets`. Both functions here compute the same set of pairs.
*/

use std::collections::BTreeSet;

use crate::automaton::{Automaton, StateSet};
use crate::expr::Expr;
use crate::interval::increment;

/// Intersect every transition of `b_state` with every combination of one
/// transition per tracked state.
///
/// Combinations are narrowed one tracked state at a time and dropped as soon
/// as their interval becomes empty.
pub(crate) fn cross_product(
    a: &Automaton,
    b: &Automaton,
    b_state: Expr,
    tracked: &StateSet,
) -> BTreeSet<(Expr, StateSet)> {
    let mut pairs = BTreeSet::new();
    for &(range, b_target) in b.transitions(b_state) {
        let mut combinations = vec![(range, StateSet::new())];
        for &state in tracked {
            let mut narrowed = Vec::with_capacity(combinations.len());
            for (common, targets) in &combinations {
                for &(range, target) in a.transitions(state) {
                    let common = common.intersect(&range);
                    if common.is_empty() {
                        continue;
                    }
                    let mut targets = targets.clone();
                    targets.insert(target);
                    narrowed.push((common, targets));
                }
            }
            combinations = narrowed;
        }
        pairs.extend(combinations.into_iter().map(|(_, targets)| (b_target, targets)));
    }
    pairs
}

/// Which automaton a transition belongs to. B sorts first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
enum Owner {
    Other,
    Tracked(Expr),
}

/// A transition taken apart for the sweep. The field order is the sort
/// order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct Atom {
    low: char,
    high: char,
    owner: Owner,
    target: Expr,
}

/// Split the alphabet at every transition boundary of `b_state` and the
/// tracked states, then read off the active transitions of each piece.
///
/// # Panics
///
/// When a piece of the alphabet is covered by no transition of `b_state`, or
/// by more than one. Neither can happen for a complete deterministic B.
pub(crate) fn atomic_sweep(
    a: &Automaton,
    b: &Automaton,
    b_state: Expr,
    tracked: &StateSet,
) -> BTreeSet<(Expr, StateSet)> {
    let mut atoms: Vec<Atom> = b
        .transitions(b_state)
        .iter()
        .map(|&(range, target)| Atom {
            low: range.low(),
            high: range.high(),
            owner: Owner::Other,
            target,
        })
        .collect();
    for &state in tracked {
        atoms.extend(a.transitions(state).iter().map(|&(range, target)| Atom {
            low: range.low(),
            high: range.high(),
            owner: Owner::Tracked(state),
            target,
        }));
    }
    atoms.sort();

    // Every piece starts either where some transition starts or right after
    // one ends.
    let cuts: BTreeSet<char> = atoms
        .iter()
        .flat_map(|atom| core::iter::once(atom.low).chain(increment(atom.high)))
        .collect();

    let mut pairs = BTreeSet::new();
    let mut active: Vec<Atom> = Vec::new();
    let mut next = 0;
    for start in cuts {
        active.retain(|atom| atom.high >= start);
        while next < atoms.len() && atoms[next].low == start {
            active.push(atoms[next]);
            next += 1;
        }
        let mut b_target = None;
        let mut a_targets = StateSet::new();
        for atom in &active {
            match atom.owner {
                Owner::Other => {
                    if b_target.replace(atom.target).is_some() {
                        panic!("transitions of {:?} overlap at {:?}", b_state, start);
                    }
                }
                Owner::Tracked(_) => {
                    a_targets.insert(atom.target);
                }
            }
        }
        match b_target {
            Some(b_target) => {
                pairs.insert((b_target, a_targets));
            }
            None => panic!("no transition of {:?} covers {:?}", b_state, start),
        }
    }
    trace!("swept {} transitions into {} pairs", atoms.len(), pairs.len());
    pairs
}
