//! Iterators and cursors over a [`Deque`].
//!
//! Shared and exclusive traversal share a single implementation: [`RawIter`]
//! and [`RawCursor`] are generic over an [`Access`] marker, and the familiar
//! names ([`Iter`], [`IterMut`], [`Cursor`], [`CursorMut`]) are aliases.
//! Positions are flattened slot coordinates, so stepping, seeking and
//! measuring distances are all O(1).

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr::{self, NonNull};

use allocator_api2::alloc::{Allocator, Global};

use crate::map::{slot_ptr, Slot};
use crate::Deque;

mod sealed {
    pub trait Sealed {}
}

/// The kind of reference an iterator or cursor hands out.
///
/// Implemented only by [`Shared`] and [`Exclusive`].
pub trait Access: sealed::Sealed {
    /// `&'a T` or `&'a mut T`.
    type Ref<'a, T: 'a>;

    #[doc(hidden)]
    unsafe fn deref<'a, T: 'a>(ptr: *mut T) -> Self::Ref<'a, T>;
}

/// Read-only access, yielding `&T`.
#[derive(Debug)]
pub enum Shared {}

/// Read-write access, yielding `&mut T`.
#[derive(Debug)]
pub enum Exclusive {}

impl sealed::Sealed for Shared {}
impl sealed::Sealed for Exclusive {}

impl Access for Shared {
    type Ref<'a, T: 'a> = &'a T;

    unsafe fn deref<'a, T: 'a>(ptr: *mut T) -> Self::Ref<'a, T> {
        unsafe { &*ptr }
    }
}

impl Access for Exclusive {
    type Ref<'a, T: 'a> = &'a mut T;

    unsafe fn deref<'a, T: 'a>(ptr: *mut T) -> Self::Ref<'a, T> {
        unsafe { &mut *ptr }
    }
}

// ---

/// Double-ended iterator over the elements of a [`Deque`].
///
/// Use [`Iterator::rev`] to walk from back to front.
pub struct RawIter<'a, T: 'a, M: Access> {
    buckets: *const NonNull<T>,
    front: usize,
    back: usize,
    marker: PhantomData<M::Ref<'a, T>>,
}

/// Iterator over shared references, see [`Deque::iter`].
pub type Iter<'a, T> = RawIter<'a, T, Shared>;

/// Iterator over mutable references, see [`Deque::iter_mut`].
pub type IterMut<'a, T> = RawIter<'a, T, Exclusive>;

impl<'a, T: 'a, M: Access> RawIter<'a, T, M> {
    /// # Safety
    ///
    /// Every flattened coordinate in `front..back` must name an initialized
    /// slot of `buckets`, borrowed as `M` for `'a`.
    pub(crate) unsafe fn new(buckets: *const NonNull<T>, front: usize, back: usize) -> Self {
        debug_assert!(front <= back);
        Self {
            buckets,
            front,
            back,
            marker: PhantomData,
        }
    }

    #[inline]
    unsafe fn element(&self, flat: usize) -> M::Ref<'a, T> {
        unsafe { M::deref(slot_ptr(self.buckets, Slot::unflatten(flat))) }
    }
}

impl<'a, T: 'a, M: Access> Iterator for RawIter<'a, T, M> {
    type Item = M::Ref<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let flat = self.front;
        self.front += 1;
        Some(unsafe { self.element(flat) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    fn count(self) -> usize {
        self.back - self.front
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a, T: 'a, M: Access> DoubleEndedIterator for RawIter<'a, T, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        self.back -= 1;
        Some(unsafe { self.element(self.back) })
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<'a, T: 'a, M: Access> FusedIterator for RawIter<'a, T, M> {}

impl<'a, T: 'a, M: Access> ExactSizeIterator for RawIter<'a, T, M> {
    fn len(&self) -> usize {
        self.back - self.front
    }
}

impl<T> Clone for RawIter<'_, T, Shared> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            front: self.front,
            back: self.back,
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RawIter<'_, T, Shared>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> fmt::Debug for RawIter<'_, T, Exclusive> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("len", &self.len()).finish()
    }
}

unsafe impl<T: Sync> Send for RawIter<'_, T, Shared> {}
unsafe impl<T: Sync> Sync for RawIter<'_, T, Shared> {}
unsafe impl<T: Send> Send for RawIter<'_, T, Exclusive> {}
unsafe impl<T: Sync> Sync for RawIter<'_, T, Exclusive> {}

// ---

/// A random-access position inside a [`Deque`].
///
/// The position is a signed index relative to the front element and may
/// wander outside `0..len`; [`current`](RawCursor::current) then returns
/// `None`. Index `len` is the end position.
///
/// Cursors compare by position, and only cursors over the same deque are
/// comparable: cursors over different deques are never equal and
/// `partial_cmp` returns `None` for them.
pub struct RawCursor<'a, T: 'a, M: Access> {
    owner: *const (),
    buckets: *const NonNull<T>,
    start: usize,
    len: usize,
    index: isize,
    marker: PhantomData<M::Ref<'a, T>>,
}

/// Read-only cursor, see [`Deque::cursor_at`].
pub type Cursor<'a, T> = RawCursor<'a, T, Shared>;

/// Read-write cursor, see [`Deque::cursor_at_mut`].
pub type CursorMut<'a, T> = RawCursor<'a, T, Exclusive>;

impl<'a, T: 'a, M: Access> RawCursor<'a, T, M> {
    /// # Safety
    ///
    /// The `len` slots starting at flattened coordinate `start` must be
    /// initialized slots of `buckets`, borrowed as `M` for `'a`.
    pub(crate) unsafe fn new(
        owner: *const (),
        buckets: *const NonNull<T>,
        start: usize,
        len: usize,
        index: isize,
    ) -> Self {
        Self {
            owner,
            buckets,
            start,
            len,
            index,
            marker: PhantomData,
        }
    }

    /// Logical index of the position, relative to the front element.
    pub fn index(&self) -> isize {
        self.index
    }

    /// Returns `true` if the cursor sits one past the back element.
    pub fn is_end(&self) -> bool {
        self.index == self.len as isize
    }

    /// Steps one element toward the back.
    pub fn move_next(&mut self) {
        self.seek(1);
    }

    /// Steps one element toward the front.
    pub fn move_prev(&mut self) {
        self.seek(-1);
    }

    /// Moves the cursor by `delta` elements; negative values move it toward
    /// the front.
    pub fn seek(&mut self, delta: isize) {
        self.index = self.index.saturating_add(delta);
    }

    /// Signed number of elements between `origin` and `self`.
    ///
    /// # Panics
    ///
    /// Panics if the cursors belong to different deques, or if the distance
    /// does not fit in an `isize` (only possible after seeking far outside
    /// `0..=len`).
    pub fn offset_from(&self, origin: &Self) -> isize {
        assert!(
            ptr::eq(self.owner, origin.owner),
            "cursors belong to different deques"
        );
        match self.index.checked_sub(origin.index) {
            Some(offset) => offset,
            None => panic!("cursor distance overflows isize"),
        }
    }

    /// The element under the cursor, or `None` outside `0..len`.
    pub fn current(&self) -> Option<&T> {
        let slot = self.slot()?;
        Some(unsafe { &*slot_ptr(self.buckets, slot) })
    }

    fn slot(&self) -> Option<Slot> {
        let index = usize::try_from(self.index).ok().filter(|&index| index < self.len)?;
        Some(Slot::unflatten(self.start + index))
    }
}

impl<'a, T: 'a> RawCursor<'a, T, Shared> {
    /// Consumes the cursor, returning the element under it for the whole
    /// borrow of the deque.
    pub fn into_ref(self) -> Option<&'a T> {
        let slot = self.slot()?;
        Some(unsafe { &*slot_ptr(self.buckets, slot) })
    }
}

impl<'a, T: 'a> RawCursor<'a, T, Exclusive> {
    /// The element under the cursor, mutably.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let slot = self.slot()?;
        Some(unsafe { &mut *slot_ptr(self.buckets, slot) })
    }

    /// Consumes the cursor, returning the element under it for the whole
    /// borrow of the deque.
    pub fn into_mut(self) -> Option<&'a mut T> {
        let slot = self.slot()?;
        Some(unsafe { &mut *slot_ptr(self.buckets, slot) })
    }
}

impl<'a, T: 'a, M: Access> AddAssign<isize> for RawCursor<'a, T, M> {
    fn add_assign(&mut self, delta: isize) {
        self.seek(delta);
    }
}

impl<'a, T: 'a, M: Access> SubAssign<isize> for RawCursor<'a, T, M> {
    fn sub_assign(&mut self, delta: isize) {
        self.seek(delta.saturating_neg());
    }
}

impl<'a, T: 'a, M: Access> Add<isize> for RawCursor<'a, T, M> {
    type Output = Self;

    fn add(mut self, delta: isize) -> Self {
        self += delta;
        self
    }
}

impl<'a, T: 'a, M: Access> Sub<isize> for RawCursor<'a, T, M> {
    type Output = Self;

    fn sub(mut self, delta: isize) -> Self {
        self -= delta;
        self
    }
}

impl<'a, T: 'a, M: Access> PartialEq for RawCursor<'a, T, M> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.owner, other.owner) && self.index == other.index
    }
}

impl<'a, T: 'a, M: Access> PartialOrd for RawCursor<'a, T, M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        ptr::eq(self.owner, other.owner).then(|| self.index.cmp(&other.index))
    }
}

impl<T> Clone for RawCursor<'_, T, Shared> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            buckets: self.buckets,
            start: self.start,
            len: self.len,
            index: self.index,
            marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, M: Access> fmt::Debug for RawCursor<'a, T, M>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("current", &self.current())
            .finish()
    }
}

unsafe impl<T: Sync> Send for RawCursor<'_, T, Shared> {}
unsafe impl<T: Sync> Sync for RawCursor<'_, T, Shared> {}
unsafe impl<T: Send> Send for RawCursor<'_, T, Exclusive> {}
unsafe impl<T: Sync> Sync for RawCursor<'_, T, Exclusive> {}

// ---

/// Owning iterator over the elements of a [`Deque`], see
/// [`Deque::into_iter`](IntoIterator::into_iter).
pub struct IntoIter<T, A: Allocator = Global> {
    deque: Deque<T, A>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(crate) fn new(deque: Deque<T, A>) -> Self {
        Self { deque }
    }
}

impl<T, A: Allocator> fmt::Debug for IntoIter<T, A>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.deque).finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.deque.len();
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back()
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {
    fn len(&self) -> usize {
        self.deque.len()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use crate::{Deque, BUCKET_CAPACITY};

    fn spanning() -> Deque<usize> {
        // Front elements sit in earlier buckets than the back ones.
        let mut deque = Deque::new();
        for i in 0..BUCKET_CAPACITY * 2 {
            deque.push_back(BUCKET_CAPACITY * 2 + i);
        }
        for i in (0..BUCKET_CAPACITY * 2).rev() {
            deque.push_front(i);
        }
        deque
    }

    #[test]
    fn test_iter_empty() {
        let base = Deque::<i32>::new();
        let mut sut = base.iter();
        assert_eq!(sut.len(), 0, "Iterator over empty Deque should have len 0");
        assert_eq!(sut.next(), None, "Iterator over empty Deque should return None");
        assert_eq!(sut.next_back(), None);
        assert_eq!(sut.clone().count(), 0, "Cloned iterator should also be empty");
    }

    #[test]
    fn test_iter_forward_and_reverse() {
        let base = spanning();
        let expected: Vec<_> = (0..BUCKET_CAPACITY * 4).collect();

        assert!(base.iter().copied().eq(expected.iter().copied()));
        assert!(
            base.iter().rev().copied().eq(expected.iter().rev().copied()),
            "Reverse iteration must visit elements back to front"
        );
    }

    #[test]
    fn test_iter_double_ended_iteration() {
        let base = Deque::from([1, 2, 3, 4]);
        let mut sut = base.iter();

        assert_eq!(sut.next_back(), Some(&4));
        assert_eq!(sut.next(), Some(&1));
        assert_eq!(sut.next_back(), Some(&3));
        assert_eq!(sut.next(), Some(&2));
        assert_eq!(sut.next_back(), None);
        assert_eq!(sut.next(), None);
    }

    #[test]
    fn test_iter_nth_jumps_across_buckets() {
        let base = spanning();
        let mut sut = base.iter();

        assert_eq!(sut.nth(40), Some(&40));
        assert_eq!(sut.len(), BUCKET_CAPACITY * 4 - 41);
        assert_eq!(sut.nth_back(30), Some(&(BUCKET_CAPACITY * 4 - 31)));
        assert_eq!(sut.next(), Some(&41));
        assert_eq!(sut.nth(usize::MAX), None, "Overshooting must exhaust the iterator");
        assert_eq!(sut.next_back(), None);
    }

    #[test]
    fn test_iter_len_consistency() {
        let base = Deque::from([10, 20, 30, 40]);
        let mut sut = base.iter();
        assert_eq!(sut.len(), 4);
        assert_eq!(sut.next(), Some(&10));
        assert_eq!(sut.len(), 3);
        assert_eq!(sut.next_back(), Some(&40));
        assert_eq!(sut.len(), 2);
        assert_eq!(sut.next(), Some(&20));
        assert_eq!(sut.len(), 1);
        assert_eq!(sut.next_back(), Some(&30));
        assert_eq!(sut.len(), 0);
        assert_eq!(sut.next(), None, "Iterator should stay fused");
    }

    #[test]
    fn test_iter_mut_mutation() {
        let mut base = spanning();
        for x in base.iter_mut() {
            *x *= 10;
        }

        assert!(base.iter().copied().eq((0..BUCKET_CAPACITY * 4).map(|x| x * 10)));

        for x in base.iter_mut().rev().take(2) {
            *x = 0;
        }
        assert_eq!(base.back(), Some(&0));
        assert_eq!(base[base.len() - 2], 0);
        assert_eq!(base[base.len() - 3], (BUCKET_CAPACITY * 4 - 3) * 10);
    }

    #[test]
    fn test_iter_mut_double_ended_iteration_and_mutation() {
        let mut base = Deque::from([1, 2, 3, 4]);
        let mut sut = base.iter_mut();

        if let Some(front) = sut.next() {
            *front *= 2;
        }

        if let Some(back) = sut.next_back() {
            *back *= 3;
        }

        assert_eq!(base, [2, 2, 3, 12], "Mutations through iter_mut should persist");
    }

    #[test]
    fn test_into_iter_double_ended_iteration() {
        let base = Deque::from([10, 20, 30, 40]);

        let mut sut = base.into_iter();
        assert_eq!(sut.len(), 4);
        assert_eq!(sut.next_back(), Some(40));
        assert_eq!(sut.next(), Some(10));
        assert_eq!(sut.next_back(), Some(30));
        assert_eq!(sut.next(), Some(20));
        assert_eq!(sut.len(), 0);
        assert_eq!(sut.next_back(), None);
        assert_eq!(sut.next(), None);
    }

    #[test]
    fn test_into_iter_drop() {
        let base = Deque::from(["a", "b", "c", "d"].map(Box::<str>::from));

        let mut sut = base.into_iter();
        assert_eq!(sut.next().as_deref(), Some("a"));
        assert_eq!(sut.next_back().as_deref(), Some("d"));

        // ensure memory gets released correctly
        core::mem::drop(sut);
    }

    #[test]
    fn test_ref_into_iter_equals_iter() {
        let base = spanning();
        assert!(base.iter().eq(&base));

        let mut base = Deque::from([0, 1, 2, 3]);
        assert!([0, 1, 2, 3].iter_mut().eq(&mut base));
    }

    #[test]
    fn test_cursor_walks_across_buckets() {
        let base = spanning();
        let mut sut = base.cursor_at(BUCKET_CAPACITY - 2);

        for expected in BUCKET_CAPACITY - 2..BUCKET_CAPACITY + 2 {
            assert_eq!(sut.current(), Some(&expected));
            sut.move_next();
        }

        for expected in (BUCKET_CAPACITY - 1..BUCKET_CAPACITY + 2).rev() {
            sut.move_prev();
            assert_eq!(sut.current(), Some(&expected));
        }
    }

    #[test]
    fn test_cursor_seek() {
        let base = spanning();
        let mut sut = base.cursor_front();

        sut += 70;
        assert_eq!(sut.index(), 70);
        assert_eq!(sut.current(), Some(&70));

        sut -= 69;
        assert_eq!(sut.current(), Some(&1));

        sut.seek(-2);
        assert_eq!(sut.index(), -1);
        assert_eq!(sut.current(), None, "Before the front there is no element");

        sut.seek(base.len() as isize + 1);
        assert!(sut.is_end());
        assert_eq!(sut.current(), None, "The end position has no element");

        sut.move_prev();
        assert_eq!(sut.into_ref(), base.back());
    }

    #[test]
    fn test_cursor_add_and_sub_leave_the_source_in_place() {
        let base = spanning();
        let sut = base.cursor_at(10);

        let ahead = sut.clone() + BUCKET_CAPACITY as isize;
        assert_eq!(ahead.current(), Some(&(BUCKET_CAPACITY + 10)));
        assert_eq!(sut.index(), 10, "Addition must not move the source cursor");

        let behind = sut.clone() - 11;
        assert_eq!(behind.index(), -1);
        assert_eq!(behind.current(), None);

        assert_eq!(ahead.offset_from(&sut), BUCKET_CAPACITY as isize);
        assert!((sut.clone() + 5 - 5) == sut);

        let mut base = spanning();
        let sut = base.cursor_front_mut() + 3;
        assert_eq!(sut.into_mut(), Some(&mut 3));
    }

    #[test]
    #[should_panic(expected = "cursor distance overflows isize")]
    fn test_cursor_offset_from_overflow() {
        let base = spanning();
        let far_back = base.cursor_front() + isize::MAX;
        let far_front = base.cursor_front() - isize::MAX - isize::MAX;
        assert_eq!(far_front.index(), isize::MIN, "Seeking saturates");
        far_back.offset_from(&far_front);
    }

    #[test]
    fn test_cursor_distance_and_ordering() {
        let base = spanning();
        let front = base.cursor_front();
        let end = base.cursor_end();

        assert_eq!(end.offset_from(&front), base.len() as isize);
        assert_eq!(front.offset_from(&end), -(base.len() as isize));
        assert!(front < end);
        assert!(end > front);

        let mut walked = front.clone();
        walked.seek(base.len() as isize);
        assert!(walked == end, "Equal positions over the same deque are equal");
        assert!(walked <= end && walked >= end);
    }

    #[test]
    fn test_cursors_over_different_deques_never_compare() {
        let a = Deque::from([1, 2, 3]);
        let b = Deque::from([1, 2, 3]);

        let sut_a = a.cursor_at(1);
        let sut_b = b.cursor_at(1);
        assert!(sut_a != sut_b, "Same position in another deque is not the same cursor");
        assert_eq!(sut_a.partial_cmp(&sut_b), None);
    }

    #[test]
    #[should_panic(expected = "cursors belong to different deques")]
    fn test_cursor_offset_from_other_deque() {
        let a = Deque::from([1, 2, 3]);
        let b = Deque::from([1, 2, 3]);
        a.cursor_end().offset_from(&b.cursor_front());
    }

    #[test]
    fn test_cursor_on_empty_deque() {
        let base = Deque::<i32>::new();
        let front = base.cursor_front();
        assert!(front.is_end(), "Front of an empty deque is its end");
        assert_eq!(front.current(), None);
        assert_eq!(base.cursor_back().index(), -1);
        assert!(front == base.cursor_end());
    }

    #[test]
    fn test_cursor_mut() {
        let mut base = spanning();
        let mut sut = base.cursor_at_mut(BUCKET_CAPACITY);

        if let Some(x) = sut.current_mut() {
            *x = 1000;
        }
        sut.move_prev();
        if let Some(x) = sut.current_mut() {
            *x = 999;
        }
        sut.seek(BUCKET_CAPACITY as isize * 8);
        assert_eq!(sut.into_mut(), None, "Past the end there is nothing to borrow");

        assert_eq!(base[BUCKET_CAPACITY - 1], 999);
        assert_eq!(base[BUCKET_CAPACITY], 1000);
        assert_eq!(base[BUCKET_CAPACITY + 1], BUCKET_CAPACITY + 1);
    }
}
