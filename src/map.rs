//! Bucket storage and the bucket map.
//!
//! Elements live in fixed-size buckets that are never resized. The map is an
//! array of bucket pointers that keeps spare buckets on both sides of the live
//! run, so that either end can grow without touching the elements.

use core::alloc::Layout;
use core::ptr::{self, NonNull};

use allocator_api2::alloc::Allocator;

use crate::error::Error;

/// Number of element slots in every bucket.
pub const BUCKET_CAPACITY: usize = 32;

/// In-map coordinate of a single element slot.
///
/// The derived ordering matches the ordering of [`Slot::flatten`], since
/// `offset` is always below [`BUCKET_CAPACITY`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Slot {
    pub(crate) bucket: usize,
    pub(crate) offset: usize,
}

impl Slot {
    /// Cursor position of a deque that has never allocated.
    /// It sits mid-bucket so that the first bucket serves pushes at both ends.
    pub(crate) const ORIGIN: Self = Self::new(0, BUCKET_CAPACITY / 2);

    pub(crate) const fn new(bucket: usize, offset: usize) -> Self {
        debug_assert!(offset < BUCKET_CAPACITY);
        Self { bucket, offset }
    }

    pub(crate) const fn flatten(self) -> usize {
        self.bucket * BUCKET_CAPACITY + self.offset
    }

    pub(crate) const fn unflatten(flat: usize) -> Self {
        Self::new(flat / BUCKET_CAPACITY, flat % BUCKET_CAPACITY)
    }

    /// The following slot, rolling over into the next bucket.
    pub(crate) const fn next(self) -> Self {
        if self.offset == BUCKET_CAPACITY - 1 {
            Self::new(self.bucket + 1, 0)
        } else {
            Self::new(self.bucket, self.offset + 1)
        }
    }

    /// The preceding slot, rolling back into the previous bucket.
    pub(crate) const fn prev(self) -> Self {
        if self.offset == 0 {
            Self::new(self.bucket - 1, BUCKET_CAPACITY - 1)
        } else {
            Self::new(self.bucket, self.offset - 1)
        }
    }

    pub(crate) const fn shifted(self, buckets: usize) -> Self {
        Self::new(self.bucket + buckets, self.offset)
    }
}

/// Resolves `slot` to a pointer into the bucket that holds it.
///
/// # Safety
///
/// `buckets` must point to a map with more than `slot.bucket` entries.
#[inline]
pub(crate) unsafe fn slot_ptr<T>(buckets: *const NonNull<T>, slot: Slot) -> *mut T {
    unsafe { (*buckets.add(slot.bucket)).as_ptr().add(slot.offset) }
}

/// An owned array of bucket pointers.
///
/// `Map` does not keep its allocator: every call that allocates or frees takes
/// it explicitly, and the owner must call [`Map::release`] before dropping it.
pub(crate) struct Map<T> {
    buckets: NonNull<NonNull<T>>,
    capacity: usize,
}

impl<T> Map<T> {
    /// A map without buckets; allocates nothing.
    pub(crate) const fn new() -> Self {
        Self {
            buckets: NonNull::dangling(),
            capacity: 0,
        }
    }

    /// Allocates a map of `count` buckets.
    ///
    /// If any allocation fails, everything allocated so far is freed before
    /// the error is returned.
    pub(crate) fn with_buckets<A: Allocator>(alloc: &A, count: usize) -> Result<Self, Error> {
        if count == 0 {
            return Ok(Self::new());
        }

        let buckets = Self::allocate_map(alloc, count)?;
        if let Err(err) = unsafe { Self::fill(alloc, buckets, 0..count) } {
            unsafe { Self::deallocate_map(alloc, buckets, count) };
            return Err(err);
        }

        Ok(Self {
            buckets,
            capacity: count,
        })
    }

    /// Number of buckets in the map.
    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) const fn as_ptr(&self) -> *const NonNull<T> {
        self.buckets.as_ptr()
    }

    /// Pointer to the element slot at `slot`.
    ///
    /// # Safety
    ///
    /// `slot.bucket` must be below [`Map::capacity`].
    #[inline]
    pub(crate) unsafe fn slot_ptr(&self, slot: Slot) -> *mut T {
        debug_assert!(slot.bucket < self.capacity);
        unsafe { slot_ptr(self.as_ptr(), slot) }
    }

    /// Replaces the map with one of `3 * capacity + 1` buckets.
    ///
    /// The current buckets move, in order, to the middle third of the new map;
    /// the first and last thirds receive freshly allocated buckets. Returns
    /// the number of positions every existing bucket moved by, which callers
    /// add to the bucket index of their cursors.
    ///
    /// On failure the map is left untouched and nothing is leaked.
    pub(crate) fn grow<A: Allocator>(&mut self, alloc: &A) -> Result<usize, Error> {
        let old = self.capacity;
        let capacity = old
            .checked_mul(3)
            .and_then(|capacity| capacity.checked_add(1))
            .ok_or(Error::CapacityOverflow)?;

        let buckets = Self::allocate_map(alloc, capacity)?;
        let fresh = (0..old).chain(2 * old..capacity);
        if let Err(err) = unsafe { Self::fill(alloc, buckets, fresh) } {
            unsafe { Self::deallocate_map(alloc, buckets, capacity) };
            return Err(err);
        }

        unsafe {
            ptr::copy_nonoverlapping(self.as_ptr(), buckets.as_ptr().add(old), old);
            if old > 0 {
                Self::deallocate_map(alloc, self.buckets, old);
            }
        }

        self.buckets = buckets;
        self.capacity = capacity;
        Ok(old)
    }

    /// Frees every bucket and the map itself, leaving an empty map behind.
    ///
    /// # Safety
    ///
    /// Every element stored in the buckets must already have been dropped or
    /// moved out, and `alloc` must be the allocator the map was built with.
    pub(crate) unsafe fn release<A: Allocator>(&mut self, alloc: &A) {
        if self.capacity == 0 {
            return;
        }

        for entry in 0..self.capacity {
            unsafe { Self::deallocate_bucket(alloc, self.as_ptr().add(entry).read()) };
        }

        unsafe { Self::deallocate_map(alloc, self.buckets, self.capacity) };
        *self = Self::new();
    }

    // ---

    fn bucket_layout() -> Result<Layout, Error> {
        Layout::array::<T>(BUCKET_CAPACITY).map_err(|_| Error::CapacityOverflow)
    }

    fn map_layout(capacity: usize) -> Result<Layout, Error> {
        Layout::array::<NonNull<T>>(capacity).map_err(|_| Error::CapacityOverflow)
    }

    fn allocate_bucket<A: Allocator>(alloc: &A) -> Result<NonNull<T>, Error> {
        let layout = Self::bucket_layout()?;
        alloc
            .allocate(layout)
            .map(NonNull::cast)
            .map_err(|_| Error::AllocError { layout })
    }

    unsafe fn deallocate_bucket<A: Allocator>(alloc: &A, bucket: NonNull<T>) {
        // The layout was valid when the bucket was allocated.
        let layout = unsafe { Self::bucket_layout().unwrap_unchecked() };
        unsafe { alloc.deallocate(bucket.cast(), layout) };
    }

    fn allocate_map<A: Allocator>(alloc: &A, capacity: usize) -> Result<NonNull<NonNull<T>>, Error> {
        let layout = Self::map_layout(capacity)?;
        alloc
            .allocate(layout)
            .map(NonNull::cast)
            .map_err(|_| Error::AllocError { layout })
    }

    unsafe fn deallocate_map<A: Allocator>(alloc: &A, buckets: NonNull<NonNull<T>>, capacity: usize) {
        let layout = unsafe { Self::map_layout(capacity).unwrap_unchecked() };
        unsafe { alloc.deallocate(buckets.cast(), layout) };
    }

    /// Stores a fresh bucket at every entry of `entries`.
    /// On failure the buckets stored by this call are freed again.
    unsafe fn fill<A, I>(alloc: &A, buckets: NonNull<NonNull<T>>, entries: I) -> Result<(), Error>
    where
        A: Allocator,
        I: Iterator<Item = usize> + Clone,
    {
        let mut filled = 0;

        for entry in entries.clone() {
            match Self::allocate_bucket(alloc) {
                Ok(bucket) => unsafe { buckets.as_ptr().add(entry).write(bucket) },
                Err(err) => {
                    for entry in entries.take(filled) {
                        unsafe { Self::deallocate_bucket(alloc, buckets.as_ptr().add(entry).read()) };
                    }
                    return Err(err);
                }
            }

            filled += 1;
        }

        Ok(())
    }
}
