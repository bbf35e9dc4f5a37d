use crate::error::{Error, Result};

/// Branching parameters `(a, b)` of an (a,b)-tree.
///
/// Every node except the top one holds at least `a` and at most `b` keys. The pair must satisfy
/// `a >= 2` and `b >= 2a - 1`; anything else is rejected by [`Params::new`].
///
/// # Examples
///
/// ```
/// use abtree::{Error, Params};
///
/// let params = Params::new(2, 4).unwrap();
/// assert_eq!(params.min_fill(), 2);
/// assert_eq!(params.max_fill(), 4);
///
/// assert_eq!(Params::new(1, 4), Err(Error::MinFillTooSmall { a: 1 }));
/// assert_eq!(Params::new(3, 4), Err(Error::MaxFillTooSmall { a: 3, b: 4, required: 5 }));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Params {
    a: usize,
    b: usize,
}

impl Params {
    /// Validates and builds a parameter pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MinFillTooSmall`] if `a < 2` and [`Error::MaxFillTooSmall`] if
    /// `b < 2a - 1`.
    pub const fn new(a: usize, b: usize) -> Result<Self> {
        if a < 2 {
            return Err(Error::MinFillTooSmall { a });
        }
        let required = a.saturating_mul(2) - 1;
        if b < required {
            return Err(Error::MaxFillTooSmall { a, b, required });
        }
        Ok(Self { a, b })
    }

    /// The minimum fill `a`.
    #[must_use]
    pub const fn min_fill(self) -> usize {
        self.a
    }

    /// The maximum fill `b`; a node holding more keys is split.
    #[must_use]
    pub const fn max_fill(self) -> usize {
        self.b
    }

    /// The smallest key count a non-top node may hold; a node holding fewer keys is joined.
    ///
    /// This is `a` whenever `b >= 2a`. For `b = 2a - 1` a split of `b + 1` keys can only produce
    /// halves of `a - 1` and `a` keys, so the threshold drops to `a - 1`.
    ///
    /// ```
    /// use abtree::Params;
    ///
    /// assert_eq!(Params::new(2, 4).unwrap().min_keys(), 2);
    /// assert_eq!(Params::new(3, 5).unwrap().min_keys(), 2);
    /// ```
    #[must_use]
    pub const fn min_keys(self) -> usize {
        let half = self.b / 2;
        if self.a < half { self.a } else { half }
    }
}

impl Default for Params {
    /// The classic 2-4 tree.
    fn default() -> Self {
        Self { a: 2, b: 4 }
    }
}
