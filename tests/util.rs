use quickcheck::{Arbitrary, Gen};
use regex_deriv::{Expr, Interval, Pool, ALPHABET_MAX, ALPHABET_MIN};

/// The symbols random expressions and words are drawn from. 'e' never
/// occurs in a range, so words containing it exercise the dead cells.
const LETTERS: &[char] = &['a', 'b', 'c', 'd', 'e'];

const MAX_WORD_LEN: usize = 8;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A random expression, kept independent of any pool so quickcheck can
/// generate and print it.
#[derive(Clone, Debug)]
pub enum Recipe {
    Empty,
    Epsilon,
    Range(char, char),
    Union(Box<Recipe>, Box<Recipe>),
    Intersect(Box<Recipe>, Box<Recipe>),
    Concat(Box<Recipe>, Box<Recipe>),
    Star(Box<Recipe>),
    Negate(Box<Recipe>),
}

impl Recipe {
    pub fn build(&self, pool: &Pool) -> Expr {
        match self {
            Recipe::Empty => pool.empty(),
            Recipe::Epsilon => pool.epsilon(),
            Recipe::Range(low, high) => pool.range(*low, *high),
            Recipe::Union(a, b) => pool.union(a.build(pool), b.build(pool)),
            Recipe::Intersect(a, b) => pool.intersect(a.build(pool), b.build(pool)),
            Recipe::Concat(a, b) => pool.concat(a.build(pool), b.build(pool)),
            Recipe::Star(a) => pool.star(a.build(pool)),
            Recipe::Negate(a) => pool.negate(a.build(pool)),
        }
    }

    fn generate(g: &mut Gen, depth: usize) -> Recipe {
        let sub = |g: &mut Gen| Box::new(Recipe::generate(g, depth - 1));
        let choice = if depth == 0 { u8::arbitrary(g) % 4 } else { u8::arbitrary(g) % 10 };
        match choice {
            0 => Recipe::Epsilon,
            1 if depth == 0 => Recipe::Empty,
            1 | 2 | 3 => {
                let x = letter(g, &LETTERS[..4]);
                let y = letter(g, &LETTERS[..4]);
                Recipe::Range(x.min(y), x.max(y))
            }
            4 | 5 => Recipe::Concat(sub(g), sub(g)),
            6 => Recipe::Union(sub(g), sub(g)),
            7 => Recipe::Intersect(sub(g), sub(g)),
            8 => Recipe::Star(sub(g)),
            _ => Recipe::Negate(sub(g)),
        }
    }
}

impl Arbitrary for Recipe {
    fn arbitrary(g: &mut Gen) -> Recipe {
        Recipe::generate(g, 3)
    }
}

/// A short random input over the test letters.
#[derive(Clone, Debug)]
pub struct Word(pub String);

impl Arbitrary for Word {
    fn arbitrary(g: &mut Gen) -> Word {
        let len = usize::arbitrary(g) % (MAX_WORD_LEN + 1);
        Word((0..len).map(|_| letter(g, LETTERS)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Word>> {
        Box::new(self.0.shrink().map(Word))
    }
}

fn letter(g: &mut Gen, letters: &[char]) -> char {
    *g.choose(letters).unwrap()
}

/// Whether `ranges`, taken in order, cover the alphabet exactly once.
pub fn is_partition<'a, I>(ranges: I) -> bool
where
    I: IntoIterator<Item = &'a Interval>,
{
    let mut expected = Some(ALPHABET_MIN);
    for range in ranges {
        if range.is_empty() || Some(range.low()) != expected {
            return false;
        }
        expected = next_symbol(range.high());
    }
    expected.is_none()
}

fn next_symbol(c: char) -> Option<char> {
    match c {
        ALPHABET_MAX => None,
        '\u{D7FF}' => Some('\u{E000}'),
        c => char::from_u32(u32::from(c) + 1),
    }
}
