use std::fmt::{Debug, Display, Formatter};

/// The replenishing interval of a [`Limit`](crate::Limit) must be strictly positive.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InvalidInterval;

/// The request can never be satisfied because it asks for more tokens than the
/// bucket is able to hold. Waiting does not help, this is a usage error.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ExceededCapacity {
    pub(crate) requested: u32,
    pub(crate) capacity: u32,
}

impl ExceededCapacity {
    /// The number of tokens that were requested.
    pub fn requested(&self) -> u32 {
        self.requested
    }

    /// The capacity of the bucket that rejected the request.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

impl Debug for InvalidInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid interval")
    }
}

impl Display for InvalidInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "replenishing interval must be a positive duration")
    }
}

impl Debug for ExceededCapacity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "exceeded capacity (requested={}, capacity={})",
            self.requested, self.capacity
        )
    }
}

impl Display for ExceededCapacity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot consume {} tokens from a bucket with capacity {}",
            self.requested, self.capacity
        )
    }
}

impl std::error::Error for InvalidInterval {}
impl std::error::Error for ExceededCapacity {}
