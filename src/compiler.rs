/*!
A pattern front end built on `regex-syntax`.

[`Compiler::compile`] translates a `regex-syntax` HIR into an expression of a
[`Pool`], keeping `^` and `$` as anchors. [`Compiler::parse`] parses pattern
text and then removes the anchors, so the result has the search semantics of
the `regex` crate: it matches any input containing a match of the pattern.

Captures are transparent and greediness is ignored, since only the language
matters. Look-arounds other than the whole-input `^` and `$` cannot be
expressed and are rejected.

```
use regex_deriv::{Compiler, Pool};

let pool = Pool::new();
let expr = Compiler::new(&pool).parse(r"^a+b$")?;
assert!(pool.is_match(expr, "aaab".chars()));
assert!(!pool.is_match(expr, "xaab".chars()));
# Ok::<(), regex_deriv::Error>(())
```
*/

use regex_syntax::hir::{Class, Hir, HirKind, Literal, Look, Repetition};

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::pool::Pool;

/// Translates `regex-syntax` HIR into expressions.
#[derive(Clone, Copy, Debug)]
pub struct Compiler<'p> {
    pool: &'p Pool,
}

impl<'p> Compiler<'p> {
    /// Create a compiler building into `pool`.
    pub fn new(pool: &'p Pool) -> Compiler<'p> {
        Compiler { pool }
    }

    /// Parse `pattern` and translate it to an anchor-free expression with
    /// search semantics.
    pub fn parse(&self, pattern: &str) -> Result<Expr> {
        let hir = regex_syntax::ParserBuilder::new().build().parse(pattern)?;
        let expr = self.compile(&hir)?;
        let expr = self.pool.remove_anchors(expr);
        trace!("parsed {:?} into {:?}", pattern, expr);
        Ok(expr)
    }

    /// Translate `hir` into an expression. Anchors are kept.
    pub fn compile(&self, hir: &Hir) -> Result<Expr> {
        let pool = self.pool;
        match hir.kind() {
            HirKind::Empty => Ok(pool.epsilon()),
            HirKind::Literal(literal) => Ok(self.compile_literal(literal)),
            HirKind::Class(class) => Ok(self.compile_class(class)),
            HirKind::Look(look) => self.compile_look(*look),
            HirKind::Repetition(rep) => self.compile_repetition(rep),
            HirKind::Capture(capture) => self.compile(&capture.sub),
            HirKind::Concat(hirs) => {
                hirs.iter().rev().try_fold(pool.epsilon(), |tail, hir| -> Result<Expr> {
                    Ok(pool.concat(self.compile(hir)?, tail))
                })
            }
            HirKind::Alternation(hirs) => {
                hirs.iter().try_fold(pool.empty(), |alternation, hir| -> Result<Expr> {
                    Ok(pool.union(alternation, self.compile(hir)?))
                })
            }
        }
    }

    fn compile_literal(&self, literal: &Literal) -> Expr {
        let pool = self.pool;
        let bytes = &literal.0;
        // A literal outside UTF-8 mode may be any byte sequence. Each byte
        // then stands for the symbol with the same value.
        let chars: Vec<char> = match core::str::from_utf8(bytes) {
            Ok(s) => s.chars().collect(),
            Err(_) => bytes.iter().map(|&byte| char::from(byte)).collect(),
        };
        chars.into_iter().rev().fold(pool.epsilon(), |tail, c| pool.concat(pool.char(c), tail))
    }

    fn compile_class(&self, class: &Class) -> Expr {
        let pool = self.pool;
        match class {
            Class::Unicode(class) => class
                .iter()
                .fold(pool.empty(), |acc, r| pool.union(acc, pool.range(r.start(), r.end()))),
            Class::Bytes(class) => class.iter().fold(pool.empty(), |acc, r| {
                pool.union(acc, pool.range(char::from(r.start()), char::from(r.end())))
            }),
        }
    }

    fn compile_look(&self, look: Look) -> Result<Expr> {
        match look {
            Look::Start => Ok(self.pool.anchor_begin()),
            Look::End => Ok(self.pool.anchor_end()),
            look => Err(Error::UnsupportedFeature(format!("look-around assertion {:?}", look))),
        }
    }

    fn compile_repetition(&self, rep: &Repetition) -> Result<Expr> {
        let pool = self.pool;
        let sub = self.compile(&rep.sub)?;
        match rep.max {
            Some(max) => pool.repeat(sub, rep.min, max),
            None => Ok(pool.concat(pool.repeat_exactly(sub, rep.min), pool.star(sub))),
        }
    }
}
