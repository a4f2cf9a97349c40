//! Error types for the `bucket_deque` crate

use core::alloc::Layout;

/// Errors reported by fallible [`Deque`](crate::Deque) operations.
///
/// A failed operation leaves the deque exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A checked access named a position past the last element.
    #[error("index {index} is out of range for a deque of length {len}")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the deque at the time of the request.
        len: usize,
    },

    /// The number of buckets needed by a growth step does not fit in `usize`.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocator refused to provide memory.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError {
        /// The layout of the refused request.
        layout: Layout,
    },
}

impl Error {
    /// Diverges the way infallible collection methods do when they cannot grow.
    #[cold]
    #[inline(never)]
    pub(crate) fn raise(self) -> ! {
        match self {
            Self::AllocError { layout } => alloc::alloc::handle_alloc_error(layout),
            other => panic!("{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::alloc::Layout;

    use super::Error;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::OutOfRange { index: 5, len: 3 }.to_string(),
            "index 5 is out of range for a deque of length 3"
        );
        assert_eq!(Error::CapacityOverflow.to_string(), "capacity overflow");

        let layout = Layout::array::<u64>(32).unwrap();
        assert_eq!(
            Error::AllocError { layout }.to_string(),
            "memory allocation of 256 bytes failed"
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_raise_capacity_overflow() {
        Error::CapacityOverflow.raise();
    }
}
