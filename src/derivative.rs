/*!
Brzozowski derivatives.

The derivative of `r` with respect to a symbol `c` denotes `{ w | cw ∈ L(r) }`.
Every rule rebuilds its result through the pool's smart constructors, so the
derivative of an interned expression is itself interned and simplified.
*/

use crate::expr::{BinaryOp, Expr, Node, UnaryOp};
use crate::nullable::Nullable;
use crate::pool::Pool;

/// Computes the derivative of expressions with respect to one symbol.
pub(crate) struct Derivative<'p> {
    pool: &'p Pool,
    nullable: Nullable<'p>,
    symbol: char,
}

impl<'p> Derivative<'p> {
    pub(crate) fn new(pool: &'p Pool, symbol: char) -> Derivative<'p> {
        Derivative { pool, nullable: Nullable::new(pool), symbol }
    }

    pub(crate) fn compute(&self, expr: Expr) -> Expr {
        match self.pool.node(expr) {
            Node::Empty | Node::Epsilon => Expr::EMPTY,
            Node::Range(range) => {
                if range.contains(self.symbol) {
                    Expr::EPSILON
                } else {
                    Expr::EMPTY
                }
            }
            Node::Binary(BinaryOp::Union, r, s) => {
                self.pool.union(self.compute(r), self.compute(s))
            }
            Node::Binary(BinaryOp::Intersect, r, s) => {
                self.pool.intersect(self.compute(r), self.compute(s))
            }
            Node::Binary(BinaryOp::Concat, r, s) => {
                // D(rs) = D(r)s + nullable(r)D(s)
                let left = self.pool.concat(self.compute(r), s);
                let nullable = self.nullable.compute(r);
                if nullable == Expr::EMPTY {
                    return left;
                }
                let right = self.pool.concat(nullable, self.compute(s));
                self.pool.union(left, right)
            }
            Node::Unary(UnaryOp::Star, r) => self.pool.concat(self.compute(r), expr),
            Node::Unary(UnaryOp::Negate, r) => self.pool.negate(self.compute(r)),
            Node::AnchorBegin | Node::AnchorEnd => {
                unreachable!("anchor reached the derivative; remove anchors first")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::Pool;

    #[test]
    fn test_range() {
        let pool = Pool::new();
        let range = pool.range('a', 'c');
        assert_eq!(pool.derivative(range, 'b'), pool.epsilon());
        assert_eq!(pool.derivative(range, 'd'), pool.empty());
        assert_eq!(pool.derivative(pool.epsilon(), 'a'), pool.empty());
        assert_eq!(pool.derivative(pool.empty(), 'a'), pool.empty());
    }

    #[test]
    fn test_concat() {
        let pool = Pool::new();
        let (a, b) = (pool.char('a'), pool.char('b'));
        let ab = pool.concat(a, b);
        assert_eq!(pool.derivative(ab, 'a'), b);
        assert_eq!(pool.derivative(ab, 'b'), pool.empty());

        // a*b: both sides contribute when the left side can vanish.
        let a_star_b = pool.concat(pool.star(a), b);
        assert_eq!(pool.derivative(a_star_b, 'a'), a_star_b);
        assert_eq!(pool.derivative(a_star_b, 'b'), pool.epsilon());
    }

    #[test]
    fn test_star() {
        let pool = Pool::new();
        let a_star = pool.star(pool.char('a'));
        assert_eq!(pool.derivative(a_star, 'a'), a_star);
        assert_eq!(pool.derivative(a_star, 'b'), pool.empty());
    }

    #[test]
    fn test_negate_and_intersect() {
        let pool = Pool::new();
        let all = pool.all();
        assert_eq!(pool.derivative(all, 'z'), all);

        let a = pool.char('a');
        let not_a = pool.negate(a);
        // After one 'a' the only rejected continuation is the empty one.
        let residual = pool.derivative(not_a, 'a');
        assert_eq!(residual, pool.negate(pool.epsilon()));
        assert!(!pool.is_nullable(residual));

        let both = pool.intersect(pool.star(a), pool.concat(a, pool.star(a)));
        assert_eq!(pool.derivative(both, 'a'), pool.star(a));
    }

    #[test]
    fn test_is_match() {
        let pool = Pool::new();
        let ab = pool.concat(pool.char('a'), pool.char('b'));
        assert!(pool.is_match(ab, "ab".chars()));
        assert!(!pool.is_match(ab, "a".chars()));
        assert!(!pool.is_match(ab, "abc".chars()));
    }

    #[test]
    #[should_panic(expected = "remove anchors first")]
    fn test_anchor_is_fatal() {
        let pool = Pool::new();
        pool.derivative(pool.anchor_end(), 'a');
    }
}
