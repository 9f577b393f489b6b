use std::fmt;

use serde::{Deserialize, Serialize};

/// Wilkinson-style model formula `response ~ predictors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub response: Term,
    pub predictors: Term,
}

impl Formula {
    pub fn new(response: Term, predictors: Term) -> Self {
        Self {
            response,
            predictors,
        }
    }
}

/// A term on either side of `~`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    Var(String),
    /// `1` (include intercept) or `0` (suppress it).
    Intercept(bool),
    /// `a + b`
    Add(Box<Term>, Box<Term>),
    /// `a - b`
    Remove(Box<Term>, Box<Term>),
    /// `a : b`
    Interaction(Box<Term>, Box<Term>),
    /// `a * b`
    Crossing(Box<Term>, Box<Term>),
    /// `a / b`
    Nesting(Box<Term>, Box<Term>),
    /// `(a + b) ^ n`
    Power(Box<Term>, u32),
    /// Function wrapper, e.g. `log(AVAL)`.
    Call { name: String, args: Vec<Term> },
    /// Conditioning `term | group`, e.g. `(1 | USUBJID)`.
    Condition { term: Box<Term>, group: Box<Term> },
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    /// Left-folds `names` into a chain of `+` terms.
    pub fn sum<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|n| Term::Var(n.into()))
            .reduce(|acc, t| Term::Add(Box::new(acc), Box::new(t)))
    }

    pub fn add(left: Term, right: Term) -> Self {
        Term::Add(Box::new(left), Box::new(right))
    }

    pub fn interaction(left: Term, right: Term) -> Self {
        Term::Interaction(Box::new(left), Box::new(right))
    }

    pub fn crossing(left: Term, right: Term) -> Self {
        Term::Crossing(Box::new(left), Box::new(right))
    }

    pub fn nesting(left: Term, right: Term) -> Self {
        Term::Nesting(Box::new(left), Box::new(right))
    }

    pub fn condition(term: Term, group: Term) -> Self {
        Term::Condition {
            term: Box::new(term),
            group: Box::new(group),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.response, self.predictors)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::Intercept(true) => write!(f, "1"),
            Term::Intercept(false) => write!(f, "0"),
            Term::Add(l, r) => write!(f, "{} + {}", l, r),
            Term::Remove(l, r) => write!(f, "{} - {}", l, r),
            Term::Interaction(l, r) => write!(f, "{}:{}", l, r),
            Term::Crossing(l, r) => write!(f, "{} * {}", l, r),
            Term::Nesting(l, r) => write!(f, "{} / {}", l, r),
            Term::Power(t, n) => write!(f, "({})^{}", t, n),
            Term::Call { name, args } => {
                let args = args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({})", name, args)
            }
            Term::Condition { term, group } => write!(f, "({} | {})", term, group),
        }
    }
}
