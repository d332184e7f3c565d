/*!
The expression algebra: an interning arena plus its smart constructors.

Every expression is built through a [`Pool`]. Each constructor first looks its
operands up in a per-operator intern table. On a miss it runs that operator's
rewrite rules, then records the result under the requested key. So a
constructor applied to the same operands always returns the same handle, and
structurally identical results share one node.

The rewrite rules preserve the language denoted by an expression. They are a
heuristic normal form, not a decision procedure: distinct nodes can still
denote the same language.

Union and intersection chains are kept as right-nested lists whose elements
are sorted by identifier and free of duplicates. Concatenation chains are
right-nested.
*/

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError, RwLock};

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::expr::{BinaryOp, Expr, Node, UnaryOp};
use crate::interval::{Interval, ALPHABET_MAX, ALPHABET_MIN};

/// An arena of hash-consed expressions.
///
/// A pool owns every node it ever creates and never frees one. Memory use is
/// proportional to the number of distinct canonical subexpressions built.
/// Callers feeding it unbounded input should cap that themselves, for example
/// with [`Config::state_limit`](crate::automaton::Config::state_limit).
///
/// A pool can be shared between threads. Concurrent calls to the same
/// constructor with the same operands all observe the same node.
#[derive(Debug)]
pub struct Pool {
    nodes: RwLock<Vec<Node>>,
    ranges: Table<(char, char)>,
    unions: Table<(Expr, Expr)>,
    intersections: Table<(Expr, Expr)>,
    concats: Table<(Expr, Expr)>,
    stars: Table<Expr>,
    negations: Table<Expr>,
}

/// The outcome of running a constructor's rewrite rules.
enum Rewrite {
    /// The operation simplifies to an existing expression.
    To(Expr),
    /// No rule applies; a fresh node is needed.
    Keep,
}

/// A grow-only map from constructor operands to the canonical result.
#[derive(Debug)]
struct Table<K> {
    map: Mutex<HashMap<K, Expr>>,
}

impl<K: Eq + Hash> Table<K> {
    fn new() -> Table<K> {
        Table { map: Mutex::new(HashMap::new()) }
    }

    fn get(&self, key: &K) -> Option<Expr> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner).get(key).copied()
    }

    /// Return the entry for `key`, running `create` under the table lock if
    /// there is none. At most one caller ever inserts a given key.
    fn get_or_insert_with(&self, key: K, create: impl FnOnce() -> Expr) -> Expr {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        *map.entry(key).or_insert_with(create)
    }
}

impl Pool {
    /// Create a pool holding only the four singleton expressions.
    pub fn new() -> Pool {
        let nodes = vec![Node::Empty, Node::Epsilon, Node::AnchorBegin, Node::AnchorEnd];
        debug_assert_eq!(nodes[Expr::EMPTY.index()], Node::Empty);
        debug_assert_eq!(nodes[Expr::ANCHOR_END.index()], Node::AnchorEnd);
        Pool {
            nodes: RwLock::new(nodes),
            ranges: Table::new(),
            unions: Table::new(),
            intersections: Table::new(),
            concats: Table::new(),
            stars: Table::new(),
            negations: Table::new(),
        }
    }

    /// The node behind an expression.
    ///
    /// # Panics
    ///
    /// When `expr` was minted by a different pool that has grown past this
    /// one.
    pub fn node(&self, expr: Expr) -> Node {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)[expr.index()]
    }

    /// The number of distinct nodes created so far.
    pub fn node_count(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn alloc(&self, node: Node) -> Expr {
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        assert!(nodes.len() < u32::MAX as usize, "expression pool exhausted");
        let expr = Expr::from_index(nodes.len());
        nodes.push(node);
        expr
    }

    /// The expression matching nothing.
    pub fn empty(&self) -> Expr {
        Expr::EMPTY
    }

    /// The expression matching only the empty sequence.
    pub fn epsilon(&self) -> Expr {
        Expr::EPSILON
    }

    /// The begin-of-input anchor.
    pub fn anchor_begin(&self) -> Expr {
        Expr::ANCHOR_BEGIN
    }

    /// The end-of-input anchor.
    pub fn anchor_end(&self) -> Expr {
        Expr::ANCHOR_END
    }

    /// The expression matching one symbol in `low..=high`.
    ///
    /// An inverted range is empty and yields [`Pool::empty`].
    pub fn range(&self, low: char, high: char) -> Expr {
        self.ranges.get_or_insert_with((low, high), || {
            let range = Interval::new(low, high);
            if range.is_empty() {
                Expr::EMPTY
            } else {
                self.alloc(Node::Range(range))
            }
        })
    }

    /// The expression matching exactly the symbol `c`.
    pub fn char(&self, c: char) -> Expr {
        self.range(c, c)
    }

    /// The expression matching any single symbol.
    pub fn dot(&self) -> Expr {
        self.range(ALPHABET_MIN, ALPHABET_MAX)
    }

    /// The expression matching every sequence, `¬∅`.
    pub fn all(&self) -> Expr {
        self.negate(Expr::EMPTY)
    }

    /// Zero or one occurrence of `expr`.
    pub fn opt(&self, expr: Expr) -> Expr {
        self.union(Expr::EPSILON, expr)
    }

    /// The union of two languages.
    pub fn union(&self, left: Expr, right: Expr) -> Expr {
        self.binary(BinaryOp::Union, left, right)
    }

    /// The intersection of two languages.
    pub fn intersect(&self, left: Expr, right: Expr) -> Expr {
        self.binary(BinaryOp::Intersect, left, right)
    }

    /// The concatenation of two languages.
    pub fn concat(&self, left: Expr, right: Expr) -> Expr {
        self.binary(BinaryOp::Concat, left, right)
    }

    /// Zero or more repetitions of `expr`.
    pub fn star(&self, expr: Expr) -> Expr {
        self.unary(UnaryOp::Star, expr)
    }

    /// Every sequence `expr` does not match.
    pub fn negate(&self, expr: Expr) -> Expr {
        self.unary(UnaryOp::Negate, expr)
    }

    /// Between `min` and `max` repetitions of `expr`, inclusive.
    ///
    /// The result is `min` mandatory copies followed by `max - min` optional
    /// ones. An error is returned when `max < min`.
    pub fn repeat(&self, expr: Expr, min: u32, max: u32) -> Result<Expr> {
        if max < min {
            return Err(Error::InvalidRepeat { min, max });
        }
        // Built from the right so each step prepends to an already
        // right-nested chain.
        let optional = self.opt(expr);
        let mut result = Expr::EPSILON;
        for _ in min..max {
            result = self.concat(optional, result);
        }
        for _ in 0..min {
            result = self.concat(expr, result);
        }
        Ok(result)
    }

    /// Exactly `times` repetitions of `expr`.
    pub fn repeat_exactly(&self, expr: Expr, times: u32) -> Expr {
        let mut result = Expr::EPSILON;
        for _ in 0..times {
            result = self.concat(expr, result);
        }
        result
    }

    /// Whether `expr` is `¬∅`.
    pub fn is_all(&self, expr: Expr) -> bool {
        self.node(expr).as_unary(UnaryOp::Negate) == Some(Expr::EMPTY)
    }

    /// Whether `expr` matches the empty sequence.
    ///
    /// # Panics
    ///
    /// When `expr` contains an anchor. Run [`Pool::remove_anchors`] first.
    pub fn is_nullable(&self, expr: Expr) -> bool {
        self.nullable(expr) == Expr::EPSILON
    }

    /// [`Pool::epsilon`] if `expr` matches the empty sequence, otherwise
    /// [`Pool::empty`].
    ///
    /// # Panics
    ///
    /// When `expr` contains an anchor.
    pub fn nullable(&self, expr: Expr) -> Expr {
        crate::nullable::Nullable::new(self).compute(expr)
    }

    /// The residual expression after consuming `symbol`.
    ///
    /// # Panics
    ///
    /// When `expr` contains an anchor.
    pub fn derivative(&self, expr: Expr, symbol: char) -> Expr {
        crate::derivative::Derivative::new(self, symbol).compute(expr)
    }

    /// The coarsest partition of the alphabet on whose cells the derivative
    /// of `expr` is constant.
    ///
    /// # Panics
    ///
    /// When `expr` contains an anchor.
    pub fn character_classes(&self, expr: Expr) -> std::collections::BTreeSet<Interval> {
        crate::classes::CharacterClasses::new(self).compute(expr)
    }

    /// Whether `expr` matches `symbols`, computed by repeated derivatives
    /// without building an automaton.
    ///
    /// # Panics
    ///
    /// When `expr` contains an anchor.
    pub fn is_match<I>(&self, expr: Expr, symbols: I) -> bool
    where
        I: IntoIterator<Item = char>,
    {
        let residual =
            symbols.into_iter().fold(expr, |state, c| self.derivative(state, c));
        self.is_nullable(residual)
    }

    /// Build the complete deterministic automaton of `expr` with no limit on
    /// its number of states.
    ///
    /// # Panics
    ///
    /// When `expr` contains an anchor.
    pub fn to_automaton(&self, expr: Expr) -> Automaton {
        crate::automaton::Builder::new().build_unbounded(self, expr)
    }

    /// Rewrite `expr` into an anchor-free expression with search semantics.
    ///
    /// An unanchored side of the pattern may be preceded or followed by any
    /// input. `^` and `$` hold only at the very start and end of the input,
    /// wherever they occur in the tree: `x*^a` matches inputs starting with
    /// `a`, while `a^b` matches nothing.
    pub fn remove_anchors(&self, expr: Expr) -> Expr {
        crate::anchors::RemoveAnchors::new(self).compute(expr)
    }

    /// Whether an anchor occurs anywhere within `expr`.
    pub fn contains_anchor(&self, expr: Expr) -> bool {
        crate::anchors::contains_anchor(self, expr)
    }

    pub(crate) fn binary(&self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let table = match op {
            BinaryOp::Union => &self.unions,
            BinaryOp::Intersect => &self.intersections,
            BinaryOp::Concat => &self.concats,
        };
        if let Some(expr) = table.get(&(left, right)) {
            return expr;
        }
        // The rewrite may recurse into other constructors, so it runs
        // outside the table lock.
        let rewrite = match op {
            BinaryOp::Union => self.simplify_union(left, right),
            BinaryOp::Intersect => self.simplify_intersect(left, right),
            BinaryOp::Concat => self.simplify_concat(left, right),
        };
        table.get_or_insert_with((left, right), || match rewrite {
            Rewrite::To(expr) => expr,
            Rewrite::Keep => self.alloc(Node::Binary(op, left, right)),
        })
    }

    pub(crate) fn unary(&self, op: UnaryOp, sub: Expr) -> Expr {
        let table = match op {
            UnaryOp::Star => &self.stars,
            UnaryOp::Negate => &self.negations,
        };
        if let Some(expr) = table.get(&sub) {
            return expr;
        }
        let rewrite = match op {
            UnaryOp::Star => self.simplify_star(sub),
            UnaryOp::Negate => self.simplify_negate(sub),
        };
        table.get_or_insert_with(sub, || match rewrite {
            Rewrite::To(expr) => expr,
            Rewrite::Keep => self.alloc(Node::Unary(op, sub)),
        })
    }

    fn simplify_union(&self, e1: Expr, e2: Expr) -> Rewrite {
        // r + r = r
        if e1 == e2 {
            return Rewrite::To(e1);
        }
        // \empty + r = r + \empty = r
        if e1 == Expr::EMPTY {
            return Rewrite::To(e2);
        }
        if e2 == Expr::EMPTY {
            return Rewrite::To(e1);
        }
        // not(\empty) absorbs everything
        if self.is_all(e1) {
            return Rewrite::To(e1);
        }
        if self.is_all(e2) {
            return Rewrite::To(e2);
        }
        let (n1, n2) = (self.node(e1), self.node(e2));
        // [a-z] + [c-d] = [a-z]
        if let (Some(r1), Some(r2)) = (n1.as_range(), n2.as_range()) {
            if r1.contains_interval(&r2) {
                return Rewrite::To(e1);
            }
            if r2.contains_interval(&r1) {
                return Rewrite::To(e2);
            }
        }
        // (r + s) + t = r + (s + t)
        if let Some((r, s)) = n1.as_binary(BinaryOp::Union) {
            let tail = self.union(s, e2);
            return Rewrite::To(self.union(r, tail));
        }
        if let Some((head, tail)) = n2.as_binary(BinaryOp::Union) {
            // a + (a + b) = a + b
            if head == e1 {
                return Rewrite::To(e2);
            }
            if e1 < head {
                return Rewrite::Keep;
            }
            // b + (a + c) = a + (b + c)
            let rest = self.union(e1, tail);
            return Rewrite::To(self.union(head, rest));
        }
        // s + r = r + s when r < s
        if e2 < e1 {
            return Rewrite::To(self.union(e2, e1));
        }
        Rewrite::Keep
    }

    fn simplify_intersect(&self, e1: Expr, e2: Expr) -> Rewrite {
        // r & r = r
        if e1 == e2 {
            return Rewrite::To(e1);
        }
        // \empty & r = r & \empty = \empty
        if e1 == Expr::EMPTY || e2 == Expr::EMPTY {
            return Rewrite::To(Expr::EMPTY);
        }
        // not(\empty) & r = r & not(\empty) = r
        if self.is_all(e1) {
            return Rewrite::To(e2);
        }
        if self.is_all(e2) {
            return Rewrite::To(e1);
        }
        let (n1, n2) = (self.node(e1), self.node(e2));
        // [a-m] & [h-z] = [h-m]
        if let (Some(r1), Some(r2)) = (n1.as_range(), n2.as_range()) {
            let common = r1.intersect(&r2);
            return Rewrite::To(self.range(common.low(), common.high()));
        }
        // (r & s) & t = r & (s & t)
        if let Some((r, s)) = n1.as_binary(BinaryOp::Intersect) {
            let tail = self.intersect(s, e2);
            return Rewrite::To(self.intersect(r, tail));
        }
        if let Some((head, tail)) = n2.as_binary(BinaryOp::Intersect) {
            // a & (a & b) = a & b
            if head == e1 {
                return Rewrite::To(e2);
            }
            if e1 < head {
                return Rewrite::Keep;
            }
            // b & (a & c) = a & (b & c)
            let rest = self.intersect(e1, tail);
            return Rewrite::To(self.intersect(head, rest));
        }
        // s & r = r & s when r < s
        if e2 < e1 {
            return Rewrite::To(self.intersect(e2, e1));
        }
        Rewrite::Keep
    }

    fn simplify_concat(&self, e1: Expr, e2: Expr) -> Rewrite {
        // \empty . r = r . \empty = \empty
        if e1 == Expr::EMPTY || e2 == Expr::EMPTY {
            return Rewrite::To(Expr::EMPTY);
        }
        // \epsilon . r = r . \epsilon = r
        if e1 == Expr::EPSILON {
            return Rewrite::To(e2);
        }
        if e2 == Expr::EPSILON {
            return Rewrite::To(e1);
        }
        let (n1, n2) = (self.node(e1), self.node(e2));
        // $ . a = \empty
        if n1 == Node::AnchorEnd && n2.as_range().is_some() {
            return Rewrite::To(Expr::EMPTY);
        }
        // a . ^ = \empty
        if n2 == Node::AnchorBegin && n1.as_range().is_some() {
            return Rewrite::To(Expr::EMPTY);
        }
        // (r . s) . t = r . (s . t)
        if let Some((r, s)) = n1.as_binary(BinaryOp::Concat) {
            let tail = self.concat(s, e2);
            return Rewrite::To(self.concat(r, tail));
        }
        Rewrite::Keep
    }

    fn simplify_star(&self, sub: Expr) -> Rewrite {
        // \epsilon* = \empty* = \epsilon
        if sub == Expr::EPSILON || sub == Expr::EMPTY {
            return Rewrite::To(Expr::EPSILON);
        }
        match self.node(sub) {
            // (r*)* = r*
            Node::Unary(UnaryOp::Star, _) => Rewrite::To(sub),
            // .* = not(\empty)
            Node::Range(range) if range.is_full() => Rewrite::To(self.all()),
            _ => Rewrite::Keep,
        }
    }

    fn simplify_negate(&self, sub: Expr) -> Rewrite {
        // not(not(r)) = r
        match self.node(sub).as_unary(UnaryOp::Negate) {
            Some(inner) => Rewrite::To(inner),
            None => Rewrite::Keep,
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
