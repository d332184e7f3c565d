/*!
Anchor removal.

The derivative, nullability and character-class computations have no meaning
for the zero-width markers `^` and `$`. Before an expression that may contain
them is handed to any of those, [`Pool::remove_anchors`] rewrites it into an
anchor-free expression with search semantics: an unanchored side may be
preceded or followed by anything.

The rewrite computes, for every subexpression and each pair of flags
`(start, end)`, the anchor-free language of the pieces it matches when that
piece begins at the start of the input (`start`) and finishes at its end
(`end`). `^` becomes `epsilon` when `start` holds and the empty language
otherwise, and `$` likewise with `end`. Unions, intersections and negations
keep their flags. A concatenation `a . b` splits its match at the point
between the two children, and each case fixes the flags exactly:

* both sides consume input, so `a` keeps `start` and `b` keeps `end`;
* only `b` consumes input, and it sees both outer flags;
* only `a` consumes input, and it sees both outer flags;
* neither consumes input.

A star is either empty, one non-empty iteration with both flags, or a first
non-empty iteration that keeps `start`, any number of inner ones, and a last
that keeps `end`. The cases are disjoint, so a negation above them stays
exact.

The whole pattern is then the union of its four flag combinations, padded
with a non-empty `all` on each side that is not at an input boundary.
Subexpressions without anchors are left as they are.

[`Pool::remove_anchors`]: crate::Pool::remove_anchors
*/

use std::collections::{HashMap, HashSet};

use crate::expr::{BinaryOp, Expr, Node, UnaryOp};
use crate::pool::Pool;

/// Rewrites expressions into anchor-free ones with search semantics.
pub(crate) struct RemoveAnchors<'p> {
    pool: &'p Pool,
    anchored: HashMap<Expr, bool>,
    rewritten: HashMap<(Expr, bool, bool), Expr>,
}

impl<'p> RemoveAnchors<'p> {
    pub(crate) fn new(pool: &'p Pool) -> RemoveAnchors<'p> {
        RemoveAnchors {
            pool,
            anchored: HashMap::new(),
            rewritten: HashMap::new(),
        }
    }

    pub(crate) fn compute(&mut self, expr: Expr) -> Expr {
        let pool = self.pool;
        let all = pool.all();
        let result = if self.is_anchored(expr) {
            let some = pool.concat(pool.dot(), all);
            let whole = self.rewrite(expr, true, true);
            let prefix = self.rewrite(expr, true, false);
            let suffix = self.rewrite(expr, false, true);
            let inner = self.rewrite(expr, false, false);
            let prefix = pool.concat(prefix, some);
            let suffix = pool.concat(some, suffix);
            let inner = pool.concat(some, pool.concat(inner, some));
            pool.union(whole, pool.union(prefix, pool.union(suffix, inner)))
        } else {
            pool.concat(all, pool.concat(expr, all))
        };
        trace!("removed anchors: {:?} => {:?}", expr, result);
        result
    }

    fn is_anchored(&mut self, expr: Expr) -> bool {
        if let Some(&anchored) = self.anchored.get(&expr) {
            return anchored;
        }
        let anchored = match self.pool.node(expr) {
            Node::Binary(_, a, b) => self.is_anchored(a) || self.is_anchored(b),
            Node::Unary(_, sub) => self.is_anchored(sub),
            node => node.is_anchor(),
        };
        self.anchored.insert(expr, anchored);
        anchored
    }

    /// The anchor-free language `expr` matches on a piece of input that
    /// begins at the input start when `start` holds and finishes at the input
    /// end when `end` holds.
    fn rewrite(&mut self, expr: Expr, start: bool, end: bool) -> Expr {
        if !self.is_anchored(expr) {
            return expr;
        }
        if let Some(&result) = self.rewritten.get(&(expr, start, end)) {
            return result;
        }
        let pool = self.pool;
        let result = match pool.node(expr) {
            Node::AnchorBegin => holds(start),
            Node::AnchorEnd => holds(end),
            Node::Empty | Node::Epsilon | Node::Range(_) => expr,
            Node::Binary(BinaryOp::Union, a, b) => {
                let a = self.rewrite(a, start, end);
                let b = self.rewrite(b, start, end);
                pool.union(a, b)
            }
            Node::Binary(BinaryOp::Intersect, a, b) => {
                let a = self.rewrite(a, start, end);
                let b = self.rewrite(b, start, end);
                pool.intersect(a, b)
            }
            Node::Binary(BinaryOp::Concat, a, b) => self.rewrite_concat(a, b, start, end),
            Node::Unary(UnaryOp::Negate, sub) => {
                let sub = self.rewrite(sub, start, end);
                pool.negate(sub)
            }
            Node::Unary(UnaryOp::Star, sub) => {
                let once = self.consumes(sub, start, end);
                let first = self.consumes(sub, start, false);
                let middle = self.consumes(sub, false, false);
                let last = self.consumes(sub, false, end);
                let many = pool.concat(first, pool.concat(pool.star(middle), last));
                pool.union(Expr::EPSILON, pool.union(once, many))
            }
        };
        self.rewritten.insert((expr, start, end), result);
        result
    }

    fn rewrite_concat(&mut self, a: Expr, b: Expr, start: bool, end: bool) -> Expr {
        let pool = self.pool;
        let split = {
            let a = self.consumes(a, start, false);
            let b = self.consumes(b, false, end);
            pool.concat(a, b)
        };
        let skip_left = {
            let a = self.vanishes(a, start, false);
            let b = self.consumes(b, start, end);
            pool.concat(a, b)
        };
        let skip_right = {
            let a = self.consumes(a, start, end);
            let b = self.vanishes(b, false, end);
            pool.concat(a, b)
        };
        let neither = {
            let a = self.vanishes(a, start, end);
            let b = self.vanishes(b, start, end);
            pool.concat(a, b)
        };
        pool.union(split, pool.union(skip_left, pool.union(skip_right, neither)))
    }

    /// The non-empty pieces `expr` matches under the flags.
    fn consumes(&mut self, expr: Expr, start: bool, end: bool) -> Expr {
        let pool = self.pool;
        let rewritten = self.rewrite(expr, start, end);
        if rewritten == Expr::EPSILON || rewritten == Expr::EMPTY {
            Expr::EMPTY
        } else if pool.is_nullable(rewritten) {
            pool.intersect(rewritten, pool.negate(Expr::EPSILON))
        } else {
            rewritten
        }
    }

    /// `epsilon` if `expr` can match the empty piece under the flags,
    /// otherwise the empty language.
    fn vanishes(&mut self, expr: Expr, start: bool, end: bool) -> Expr {
        let rewritten = self.rewrite(expr, start, end);
        self.pool.nullable(rewritten)
    }
}

fn holds(condition: bool) -> Expr {
    if condition {
        Expr::EPSILON
    } else {
        Expr::EMPTY
    }
}

/// Whether an anchor occurs anywhere within `expr`.
pub(crate) fn contains_anchor(pool: &Pool, expr: Expr) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![expr];
    while let Some(expr) = stack.pop() {
        if !seen.insert(expr) {
            continue;
        }
        match pool.node(expr) {
            node if node.is_anchor() => return true,
            Node::Binary(_, a, b) => {
                stack.push(a);
                stack.push(b);
            }
            Node::Unary(_, sub) => stack.push(sub),
            _ => {}
        }
    }
    false
}
#[cfg(test)]
mod tests {
    use crate::pool::Pool;

    fn seq(pool: &Pool, s: &str) -> crate::Expr {
        s.chars().rev().fold(pool.epsilon(), |acc, c| pool.concat(pool.char(c), acc))
    }

    #[test]
    fn test_begin_anchor() {
        let pool = Pool::new();
        // ^ab
        let expr = pool.concat(pool.anchor_begin(), seq(&pool, "ab"));
        let expr = pool.remove_anchors(expr);
        assert!(!pool.contains_anchor(expr));
        assert!(pool.is_match(expr, "ab".chars()));
        assert!(pool.is_match(expr, "abx".chars()));
        assert!(!pool.is_match(expr, "xab".chars()));
    }

    #[test]
    fn test_end_anchor() {
        let pool = Pool::new();
        // ab$
        let expr = pool.concat(seq(&pool, "ab"), pool.anchor_end());
        let expr = pool.remove_anchors(expr);
        assert!(pool.is_match(expr, "xab".chars()));
        assert!(!pool.is_match(expr, "abx".chars()));
    }

    #[test]
    fn test_both_anchors() {
        let pool = Pool::new();
        // ^a$
        let a = pool.char('a');
        let expr = pool.concat(pool.anchor_begin(), pool.concat(a, pool.anchor_end()));
        let expr = pool.remove_anchors(expr);
        assert_eq!(expr, a);
    }

    #[test]
    fn test_unanchored_is_search() {
        let pool = Pool::new();
        let expr = pool.remove_anchors(seq(&pool, "ab"));
        assert!(pool.is_match(expr, "ab".chars()));
        assert!(pool.is_match(expr, "xxabyy".chars()));
        assert!(!pool.is_match(expr, "ba".chars()));
    }

    #[test]
    fn test_anchor_in_alternation() {
        let pool = Pool::new();
        // (^a|b)c
        let (a, b, c) = (pool.char('a'), pool.char('b'), pool.char('c'));
        let alternation = pool.union(pool.concat(pool.anchor_begin(), a), b);
        let expr = pool.remove_anchors(pool.concat(alternation, c));
        assert!(pool.is_match(expr, "ac".chars()));
        assert!(pool.is_match(expr, "acx".chars()));
        assert!(!pool.is_match(expr, "xac".chars()));
        assert!(pool.is_match(expr, "xbcx".chars()));
    }

    #[test]
    fn test_anchor_facing_a_symbol() {
        let pool = Pool::new();
        // a^b
        let expr = pool.concat(pool.char('a'), pool.concat(pool.anchor_begin(), pool.char('b')));
        assert_eq!(pool.remove_anchors(expr), pool.empty());
    }

    #[test]
    fn test_bare_anchor() {
        let pool = Pool::new();
        for anchor in [pool.anchor_begin(), pool.anchor_end()] {
            let expr = pool.remove_anchors(anchor);
            assert!(!pool.contains_anchor(expr));
            for input in ["", "x", "xyz"] {
                assert!(pool.is_match(expr, input.chars()));
            }
        }
    }

    #[test]
    fn test_anchor_under_star() {
        let pool = Pool::new();
        // (^a)*b
        let starred = pool.star(pool.concat(pool.anchor_begin(), pool.char('a')));
        let expr = pool.remove_anchors(pool.concat(starred, pool.char('b')));
        assert!(!pool.contains_anchor(expr));
        assert!(pool.is_match(expr, "ab".chars()));
        assert!(pool.is_match(expr, "xb".chars()));
        assert!(!pool.is_match(expr, "x".chars()));
    }

    #[test]
    fn test_anchor_after_nullable_prefix() {
        let pool = Pool::new();
        // x*^a
        let prefix = pool.star(pool.char('x'));
        let expr = pool.concat(prefix, pool.concat(pool.anchor_begin(), pool.char('a')));
        let expr = pool.remove_anchors(expr);
        assert!(pool.is_match(expr, "a".chars()));
        assert!(pool.is_match(expr, "ab".chars()));
        assert!(!pool.is_match(expr, "xa".chars()));
        assert!(!pool.is_match(expr, "ba".chars()));
    }

    #[test]
    fn test_anchor_before_nullable_suffix() {
        let pool = Pool::new();
        // a$x*
        let suffix = pool.star(pool.char('x'));
        let expr = pool.concat(pool.char('a'), pool.concat(pool.anchor_end(), suffix));
        let expr = pool.remove_anchors(expr);
        assert!(pool.is_match(expr, "a".chars()));
        assert!(pool.is_match(expr, "ba".chars()));
        assert!(!pool.is_match(expr, "ax".chars()));
    }

    #[test]
    fn test_repeated_anchors() {
        let pool = Pool::new();
        let a = pool.char('a');
        let twice = pool.concat(pool.anchor_begin(), pool.concat(pool.anchor_begin(), a));
        let expr = pool.remove_anchors(twice);
        assert!(pool.is_match(expr, "ab".chars()));
        assert!(!pool.is_match(expr, "ba".chars()));

        // ^^a$
        let exact = pool.concat(twice, pool.anchor_end());
        assert_eq!(pool.remove_anchors(exact), a);
    }

    #[test]
    fn test_end_then_begin() {
        let pool = Pool::new();
        // $^
        let expr = pool.concat(pool.anchor_end(), pool.anchor_begin());
        assert_eq!(pool.remove_anchors(expr), pool.epsilon());
    }

    #[test]
    fn test_nullable_prefix_keeps_begin_anchor() {
        let pool = Pool::new();
        // ^x*b
        let tail = pool.concat(pool.star(pool.char('x')), pool.char('b'));
        let expr = pool.remove_anchors(pool.concat(pool.anchor_begin(), tail));
        assert!(pool.is_match(expr, "b".chars()));
        assert!(pool.is_match(expr, "xxb".chars()));
        assert!(!pool.is_match(expr, "zzb".chars()));
    }

    #[test]
    fn test_anchor_under_negation() {
        let pool = Pool::new();
        // ^¬(^a)$: every whole input except "a"
        let not_a = pool.negate(pool.concat(pool.anchor_begin(), pool.char('a')));
        let expr = pool.concat(pool.anchor_begin(), pool.concat(not_a, pool.anchor_end()));
        let expr = pool.remove_anchors(expr);
        assert!(!pool.is_match(expr, "a".chars()));
        assert!(pool.is_match(expr, "".chars()));
        assert!(pool.is_match(expr, "aa".chars()));
        assert!(pool.is_match(expr, "b".chars()));

        // ¬$ never matches the empty piece at the end of the input
        let expr = pool.remove_anchors(pool.negate(pool.anchor_end()));
        assert!(!pool.is_match(expr, "".chars()));
        assert!(pool.is_match(expr, "x".chars()));
    }

    #[test]
    fn test_contains_anchor() {
        let pool = Pool::new();
        let a = pool.char('a');
        assert!(!pool.contains_anchor(pool.star(a)));
        assert!(pool.contains_anchor(pool.union(a, pool.star(pool.anchor_end()))));
        assert!(pool.contains_anchor(pool.anchor_begin()));
    }
}
