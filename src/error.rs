/// The result type used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while building expressions or automata.
///
/// Only conditions a caller can provoke with bad input are reported here.
/// Violations of the engine's own invariants (an anchor reaching the
/// derivative, a symbol no transition covers, a product cell without a
/// transition of the second automaton) are bugs and panic instead.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A bounded repetition whose upper bound is below its lower bound.
    InvalidRepeat {
        /// The requested minimum number of repetitions.
        min: u32,
        /// The requested maximum number of repetitions.
        max: u32,
    },
    /// Automaton construction discovered more states than the configured
    /// limit allows.
    TooManyStates {
        /// The limit that was exceeded.
        limit: usize,
    },
    /// The pattern front end could not parse a pattern.
    Syntax(regex_syntax::Error),
    /// The pattern uses a construct the expression algebra cannot express.
    UnsupportedFeature(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidRepeat { min, max } => write!(
                f,
                "invalid repetition {{{},{}}}: upper bound is less than lower bound",
                min, max
            ),
            Error::TooManyStates { limit } => {
                write!(f, "automaton exceeded the limit of {} states", limit)
            }
            Error::Syntax(err) => write!(f, "{}", err),
            Error::UnsupportedFeature(feature) => {
                write!(f, "unsupported feature: {}", feature)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex_syntax::Error> for Error {
    fn from(err: regex_syntax::Error) -> Error {
        Error::Syntax(err)
    }
}
