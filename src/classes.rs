/*!
Character classes: the alphabet partition an expression's next step depends on.

For an expression `r`, the classes are a set of pairwise disjoint intervals
covering the whole alphabet such that any two symbols drawn from the same
interval give the same derivative of `r`. Automaton construction takes one
derivative per class instead of one per symbol.
*/

use std::collections::BTreeSet;

use crate::expr::{BinaryOp, Expr, Node};
use crate::interval::Interval;
use crate::pool::Pool;

/// Computes the character classes of expressions.
pub(crate) struct CharacterClasses<'p> {
    pool: &'p Pool,
}

impl<'p> CharacterClasses<'p> {
    pub(crate) fn new(pool: &'p Pool) -> CharacterClasses<'p> {
        CharacterClasses { pool }
    }

    pub(crate) fn compute(&self, expr: Expr) -> BTreeSet<Interval> {
        match self.pool.node(expr) {
            // The derivative is EMPTY everywhere.
            Node::Empty | Node::Epsilon => BTreeSet::from([Interval::full()]),
            Node::Range(range) => {
                let mut classes = BTreeSet::from([range]);
                classes.extend(range.complement());
                classes
            }
            Node::Unary(_, sub) => self.compute(sub),
            // The right side is never consulted while the left cannot vanish.
            Node::Binary(BinaryOp::Concat, left, _) if !self.pool.is_nullable(left) => {
                self.compute(left)
            }
            Node::Binary(_, left, right) => refine(&self.compute(left), &self.compute(right)),
            Node::AnchorBegin | Node::AnchorEnd => {
                unreachable!("anchor reached the character classes; remove anchors first")
            }
        }
    }
}

/// The common refinement of two partitions of the alphabet: every non-empty
/// intersection of one cell from each side.
///
/// Both inputs are sorted partitions, so the non-empty intersections are
/// exactly what a merge of the two cell sequences visits.
fn refine(left: &BTreeSet<Interval>, right: &BTreeSet<Interval>) -> BTreeSet<Interval> {
    let mut classes = BTreeSet::new();
    let mut lefts = left.iter().copied().peekable();
    let mut rights = right.iter().copied().peekable();
    while let (Some(&l), Some(&r)) = (lefts.peek(), rights.peek()) {
        let common = l.intersect(&r);
        if !common.is_empty() {
            classes.insert(common);
        }
        match l.high().cmp(&r.high()) {
            core::cmp::Ordering::Less => {
                lefts.next();
            }
            core::cmp::Ordering::Greater => {
                rights.next();
            }
            core::cmp::Ordering::Equal => {
                lefts.next();
                rights.next();
            }
        }
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{ALPHABET_MAX, ALPHABET_MIN};

    fn pairwise(left: &BTreeSet<Interval>, right: &BTreeSet<Interval>) -> BTreeSet<Interval> {
        let mut classes = BTreeSet::new();
        for l in left {
            for r in right {
                let common = l.intersect(r);
                if !common.is_empty() {
                    classes.insert(common);
                }
            }
        }
        classes
    }

    #[test]
    fn test_range_classes() {
        let pool = Pool::new();
        let classes = pool.character_classes(pool.char('m'));
        let expected = BTreeSet::from([
            Interval::new(ALPHABET_MIN, 'l'),
            Interval::singleton('m'),
            Interval::new('n', ALPHABET_MAX),
        ]);
        assert_eq!(classes, expected);
        assert_eq!(pool.character_classes(pool.dot()), BTreeSet::from([Interval::full()]));
    }

    #[test]
    fn test_union_classes() {
        let pool = Pool::new();
        let expr = pool.union(pool.char('a'), pool.char('b'));
        let expected = BTreeSet::from([
            Interval::new(ALPHABET_MIN, '`'),
            Interval::singleton('a'),
            Interval::singleton('b'),
            Interval::new('c', ALPHABET_MAX),
        ]);
        assert_eq!(pool.character_classes(expr), expected);
    }

    #[test]
    fn test_concat_ignores_right_side_until_left_vanishes() {
        let pool = Pool::new();
        let (a, b) = (pool.char('a'), pool.char('b'));
        assert_eq!(pool.character_classes(pool.concat(a, b)), pool.character_classes(a));

        let classes = pool.character_classes(pool.concat(pool.star(a), b));
        assert!(classes.contains(&Interval::singleton('a')));
        assert!(classes.contains(&Interval::singleton('b')));
    }

    #[test]
    fn test_refine_matches_pairwise() {
        let pool = Pool::new();
        let left = pool.character_classes(pool.range('c', 'x'));
        let right = pool.character_classes(pool.union(pool.char('a'), pool.range('m', 'z')));
        assert_eq!(refine(&left, &right), pairwise(&left, &right));
        assert_eq!(refine(&right, &left), pairwise(&left, &right));
    }

    #[test]
    fn test_empty_and_epsilon() {
        let pool = Pool::new();
        let full = BTreeSet::from([Interval::full()]);
        assert_eq!(pool.character_classes(pool.empty()), full);
        assert_eq!(pool.character_classes(pool.epsilon()), full);
        assert_eq!(pool.character_classes(pool.all()), full);
    }

    #[test]
    #[should_panic(expected = "remove anchors first")]
    fn test_anchor_is_fatal() {
        let pool = Pool::new();
        pool.character_classes(pool.union(pool.char('a'), pool.anchor_end()));
    }
}
