/*!
A symbolic regular expression engine based on derivatives.

Expressions over Unicode scalar values are built in a [`Pool`], which
hash-conses every node and simplifies it as it is constructed. On top of that
algebra the crate provides:

* nullability, [Brzozowski derivatives] and character classes, the coarsest
  partition of the alphabet on which the derivative of an expression is
  constant;
* matching by repeated derivatives, without building any automaton;
* lazy construction of a complete deterministic [`Automaton`] whose states
  are expressions;
* [composition](Automaton::compose) of an automaton with a second one, with
  two interchangeable product algorithms;
* [removal of anchors](Pool::remove_anchors), turning `^` and `$` into search
  semantics;
* a [front end](Compiler) translating `regex-syntax` patterns.

Expressions support intersection and complement alongside the usual regular
operators.

# Example

```
use regex_deriv::Pool;

let pool = Pool::new();
// Strings of a's and b's that contain "ab" but not "ba".
let ab_or_ba = pool.union(pool.char('a'), pool.char('b'));
let any = pool.star(ab_or_ba);
let contains = |x: char, y: char| {
    let pair = pool.concat(pool.char(x), pool.char(y));
    pool.concat(any, pool.concat(pair, any))
};
let expr = pool.intersect(contains('a', 'b'), pool.negate(contains('b', 'a')));

let dfa = pool.to_automaton(expr);
assert!(dfa.is_match("aabb".chars()));
assert!(!dfa.is_match("abab".chars()));
assert!(!dfa.is_empty());
```

# Crate features

* **std** - Required. The crate does not support `no_std` builds yet.
* **unicode** - Enables the Unicode tables of `regex-syntax`, needed for
  patterns such as `\w` or `\p{Greek}`.
* **logging** - Emits construction statistics through the `log` crate.

[Brzozowski derivatives]: https://en.wikipedia.org/wiki/Brzozowski_derivative
*/

#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
compile_error!("regex-deriv currently requires the 'std' feature");

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

#[macro_use]
mod macros;

mod anchors;
pub mod automaton;
mod classes;
mod compiler;
mod derivative;
mod error;
mod expr;
mod interval;
mod nullable;
mod pool;
mod product;

pub use crate::automaton::Automaton;
pub use crate::compiler::Compiler;
pub use crate::error::{Error, Result};
pub use crate::expr::{BinaryOp, Expr, Node, UnaryOp};
pub use crate::interval::{Interval, ALPHABET_MAX, ALPHABET_MIN};
pub use crate::pool::Pool;
