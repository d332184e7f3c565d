/*!
Handles to interned expressions and the read-only view of their nodes.

An [`Expr`] is a small `Copy` identifier minted by a [`Pool`](crate::Pool).
The pool hash-conses every node, so two handles are equal exactly when they
refer to the same canonical node, and comparing handles is how the rest of
the crate compares expressions. Identifiers grow strictly with construction
order, which the simplifier relies on to order the operands of commutative
operators.
*/

use crate::interval::Interval;

/// A handle to an interned expression node.
///
/// Handles are only meaningful for the pool that created them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Expr(u32);

impl Expr {
    /// The expression matching nothing.
    pub const EMPTY: Expr = Expr(0);
    /// The expression matching only the empty sequence.
    pub const EPSILON: Expr = Expr(1);
    /// The zero-width begin-of-input marker.
    pub const ANCHOR_BEGIN: Expr = Expr(2);
    /// The zero-width end-of-input marker.
    pub const ANCHOR_END: Expr = Expr(3);

    pub(crate) fn from_index(index: usize) -> Expr {
        // The pool refuses to grow past u32::MAX nodes.
        Expr(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// The construction-order identifier of this node.
    pub fn id(self) -> u32 {
        self.0
    }
}

/// The binary operators of the algebra.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum BinaryOp {
    /// Language union.
    Union,
    /// Language intersection.
    Intersect,
    /// Concatenation.
    Concat,
}

/// The unary operators of the algebra.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum UnaryOp {
    /// Kleene star.
    Star,
    /// Complement with respect to all sequences.
    Negate,
}

/// A node of the expression tree.
///
/// Nodes are values copied out of the pool. They can be inspected but not
/// turned back into expressions; only the pool's smart constructors do that.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Node {
    /// Matches nothing.
    Empty,
    /// Matches only the empty sequence.
    Epsilon,
    /// Zero-width begin-of-input marker.
    AnchorBegin,
    /// Zero-width end-of-input marker.
    AnchorEnd,
    /// Matches exactly one symbol within the interval. Never empty.
    Range(Interval),
    /// A binary operator applied to two subexpressions.
    Binary(BinaryOp, Expr, Expr),
    /// A unary operator applied to a subexpression.
    Unary(UnaryOp, Expr),
}

impl Node {
    /// The interval of a range node.
    pub fn as_range(&self) -> Option<Interval> {
        match *self {
            Node::Range(range) => Some(range),
            _ => None,
        }
    }

    /// The operands of a binary node using `op`.
    pub fn as_binary(&self, op: BinaryOp) -> Option<(Expr, Expr)> {
        match *self {
            Node::Binary(o, left, right) if o == op => Some((left, right)),
            _ => None,
        }
    }

    /// The operand of a unary node using `op`.
    pub fn as_unary(&self, op: UnaryOp) -> Option<Expr> {
        match *self {
            Node::Unary(o, sub) if o == op => Some(sub),
            _ => None,
        }
    }

    /// Whether this node is one of the two anchors.
    pub fn is_anchor(&self) -> bool {
        matches!(*self, Node::AnchorBegin | Node::AnchorEnd)
    }
}
