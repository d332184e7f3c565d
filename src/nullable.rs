/*!
Nullability as an algebra value.

Instead of a `bool`, nullability is reported as [`Expr::EPSILON`] (nullable) or
[`Expr::EMPTY`] (not nullable). Those two expressions form a two-point
semiring under the pool's own `union` and `intersect`, so results combine with
the same constructors used everywhere else. The derivative of a concatenation
uses this directly: `nullable(a) . D(b)` collapses to `EMPTY` on its own when
`a` cannot vanish.
*/

use crate::expr::{BinaryOp, Expr, Node, UnaryOp};
use crate::pool::Pool;

/// Computes whether an expression accepts the empty sequence.
pub(crate) struct Nullable<'p> {
    pool: &'p Pool,
}

impl<'p> Nullable<'p> {
    pub(crate) fn new(pool: &'p Pool) -> Nullable<'p> {
        Nullable { pool }
    }

    /// `EPSILON` if `expr` is nullable, otherwise `EMPTY`.
    pub(crate) fn compute(&self, expr: Expr) -> Expr {
        match self.pool.node(expr) {
            Node::Empty | Node::Range(_) => Expr::EMPTY,
            Node::Epsilon => Expr::EPSILON,
            Node::Binary(BinaryOp::Union, left, right) => {
                self.pool.union(self.compute(left), self.compute(right))
            }
            Node::Binary(BinaryOp::Intersect | BinaryOp::Concat, left, right) => {
                let left = self.compute(left);
                if left == Expr::EMPTY {
                    return Expr::EMPTY;
                }
                self.pool.intersect(left, self.compute(right))
            }
            Node::Unary(UnaryOp::Star, _) => Expr::EPSILON,
            Node::Unary(UnaryOp::Negate, sub) => {
                if self.compute(sub) == Expr::EMPTY {
                    Expr::EPSILON
                } else {
                    Expr::EMPTY
                }
            }
            Node::AnchorBegin | Node::AnchorEnd => {
                unreachable!("anchor reached the nullability check; remove anchors first")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::Pool;

    #[test]
    fn test_leaves() {
        let pool = Pool::new();
        assert!(!pool.is_nullable(pool.empty()));
        assert!(pool.is_nullable(pool.epsilon()));
        assert!(!pool.is_nullable(pool.char('a')));
        assert!(!pool.is_nullable(pool.dot()));
    }

    #[test]
    fn test_operators() {
        let pool = Pool::new();
        let a = pool.char('a');
        let a_star = pool.star(a);
        assert!(pool.is_nullable(a_star));
        assert!(pool.is_nullable(pool.opt(a)));
        assert!(!pool.is_nullable(pool.concat(a_star, a)));
        assert!(pool.is_nullable(pool.concat(a_star, a_star)));
        assert!(pool.is_nullable(pool.intersect(a_star, pool.star(pool.char('b')))));
        assert!(!pool.is_nullable(pool.intersect(a_star, pool.concat(a, a_star))));
        assert!(pool.is_nullable(pool.all()));
        assert!(!pool.is_nullable(pool.negate(a_star)));
        assert!(pool.is_nullable(pool.negate(a)));
    }

    #[test]
    fn test_returns_algebra_values() {
        let pool = Pool::new();
        let a = pool.char('a');
        assert_eq!(pool.nullable(pool.star(a)), pool.epsilon());
        assert_eq!(pool.nullable(a), pool.empty());
    }

    #[test]
    #[should_panic(expected = "remove anchors first")]
    fn test_anchor_is_fatal() {
        let pool = Pool::new();
        let expr = pool.concat(pool.anchor_begin(), pool.char('a'));
        pool.is_nullable(expr);
    }
}
