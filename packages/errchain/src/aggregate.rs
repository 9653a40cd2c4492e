//! Several errors reported as one
//!
//! An [`Aggregate`] is never empty: building one from nothing, or from
//! nothing but `None`s, yields no error at all.
//!
//! ```
//! use errchain::{new_aggregate, Error};
//!
//! let none: Vec<Option<Error>> = vec![None, None];
//! assert!(new_aggregate(none).is_none());
//!
//! let agg = new_aggregate([Error::new("x"), Error::new("x"), Error::new("y")]).unwrap();
//! assert_eq!(agg.to_string(), "[x, y]");
//! ```

use crate::error::{is, Error};
use indexmap::IndexSet;
use std::fmt;

/// Predicate selecting errors for [`filter_out`]
pub type Matcher<'a> = &'a dyn Fn(&Error) -> bool;

/// A non-empty, ordered collection of errors
#[derive(Clone)]
pub struct Aggregate {
    errors: Vec<Error>,
}

/// Collect errors into an aggregate, dropping `None`s
///
/// Returns `None` when no error remains.
pub fn new_aggregate<I>(errors: I) -> Option<Aggregate>
where
    I: IntoIterator,
    I::Item: Into<Option<Error>>,
{
    let errors: Vec<Error> = errors.into_iter().filter_map(Into::into).collect();
    if errors.is_empty() {
        None
    } else {
        Some(Aggregate { errors })
    }
}

impl Aggregate {
    /// The contained errors, without flattening nested aggregates
    #[must_use]
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Whether any contained error, nested aggregates included, matches
    /// `target` under [`is`]
    #[must_use]
    pub fn is(&self, target: &Error) -> bool {
        self.visit(&mut |err| is(err, target))
    }

    /// All contained errors with nested aggregates flattened, in order
    #[must_use]
    pub fn flatten(&self) -> Vec<Error> {
        let mut flat = Vec::with_capacity(self.errors.len());
        self.visit(&mut |err| {
            flat.push(err.clone());
            false
        });
        flat
    }

    /// Call `f` on every contained error, descending into nested aggregates
    ///
    /// Stops as soon as `f` returns `true` and reports whether it did.
    fn visit<F>(&self, f: &mut F) -> bool
    where
        F: FnMut(&Error) -> bool,
    {
        for err in &self.errors {
            let hit = match err.aggregate() {
                Some(nested) => nested.visit(f),
                None => f(err),
            };
            if hit {
                return true;
            }
        }
        false
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.errors.as_slice() {
            return write!(f, "{only}");
        }

        let mut seen = IndexSet::new();
        self.visit(&mut |err| {
            seen.insert(err.to_string());
            false
        });

        let joined = seen
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if seen.len() == 1 {
            f.write_str(&joined)
        } else {
            write!(f, "[{joined}]")
        }
    }
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.errors.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Aggregate {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Remove every error selected by a matcher
///
/// An aggregate is filtered recursively: nested aggregates are flattened,
/// selected errors dropped and the rest collected into a new aggregate, or
/// into no error when nothing is left. Any other error is returned unless a
/// matcher selects it.
pub fn filter_out(err: impl Into<Option<Error>>, matchers: &[Matcher<'_>]) -> Option<Error> {
    let err = err.into()?;

    if let Some(aggregate) = err.aggregate() {
        let mut kept = Vec::new();
        aggregate.visit(&mut |inner| {
            if !matches_any(inner, matchers) {
                kept.push(inner.clone());
            }
            false
        });
        return new_aggregate(kept).map(Error::from);
    }

    if matches_any(&err, matchers) {
        None
    } else {
        Some(err)
    }
}

fn matches_any(err: &Error, matchers: &[Matcher<'_>]) -> bool {
    matchers.iter().any(|matcher| matcher(err))
}
