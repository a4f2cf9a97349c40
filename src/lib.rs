#![no_std]

//! A **double-ended queue** stored in **fixed-size buckets**, with **O(1) indexing**
//! and a **pluggable allocator**, `no_std` compatible.
//!
//! `Deque<T, A>` keeps its elements in buckets of [`BUCKET_CAPACITY`] slots.
//! An array of bucket pointers (the map) keeps spare buckets on both sides of
//! the live elements, so pushing at either end is amortized O(1) and never
//! moves an element. When one end runs out of buckets the map is rebuilt three
//! times larger (plus one) with the existing buckets in its middle third.
//!
//! This type is ideal for cases where:
//! - You need a queue that grows at both ends with stable element addresses
//!   between reallocations of the map.
//! - You want random access by index alongside double-ended pushes and pops.
//! - You need to control where the memory comes from, through an
//!   [`Allocator`].
//!
//! ```rust
//! use bucket_deque::Deque;
//!
//! let mut d = Deque::from([1, 2, 3]);
//! d.push_front(0);
//! assert_eq!(d, [0, 1, 2, 3]);
//!
//! assert_eq!(d.pop_back(), Some(3));
//! assert_eq!(d, [0, 1, 2]);
//!
//! assert_eq!(d[1], 1);
//! assert!(d.at(5).is_err());
//!
//! d.insert(1, 10);
//! assert_eq!(d.remove(2), Some(1));
//! assert_eq!(d.iter().rev().copied().collect::<Vec<_>>(), [2, 10, 0]);
//! ```

extern crate alloc;
#[cfg(test)]
extern crate std;

mod error;
mod iter;
mod map;
#[cfg(test)]
mod testing;

use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use core::{fmt, mem, ptr};

pub use allocator_api2::alloc::{Allocator, Global};

pub use crate::error::Error;
pub use crate::iter::{
    Access, Cursor, CursorMut, Exclusive, IntoIter, Iter, IterMut, RawCursor, RawIter, Shared,
};
pub use crate::map::BUCKET_CAPACITY;

use crate::map::{Map, Slot};

/// A double-ended queue with O(1) indexing, stored in fixed-size buckets.
///
/// `Deque` is similar to `VecDeque`, except:
/// - Elements are never moved by growth: only the array of bucket pointers
///   is reallocated.
/// - Memory is requested from the allocator one bucket at a time, plus the
///   bucket map.
/// - Nothing is allocated until the first element is pushed, unless a
///   capacity is requested up front.
pub struct Deque<T, A: Allocator = Global> {
    len: usize,
    head: Slot,
    tail: Slot,
    map: Map<T>,
    alloc: A,
    marker: PhantomData<T>,
}

impl<T> Deque<T> {
    /// Creates a new, empty `Deque`.
    /// No memory is allocated until an element is pushed.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let d = Deque::<i32>::new();
    /// assert_eq!(d.len(), 0);
    /// assert_eq!(d.capacity(), 0);
    /// assert!(d.is_empty());
    /// ```
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty `Deque` with room for at least `capacity` elements
    /// pushed at the back.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    ///
    /// ```
    /// use bucket_deque::{Deque, BUCKET_CAPACITY};
    ///
    /// let d = Deque::<u8>::with_capacity(40);
    /// assert_eq!(d.capacity(), 2 * BUCKET_CAPACITY);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Creates a `Deque` holding `count` clones of `value`.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let d = Deque::from_elem("x", 3);
    /// assert_eq!(d, ["x", "x", "x"]);
    /// ```
    pub fn from_elem(value: T, count: usize) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(value, count, Global)
    }

    /// Creates a `Deque` holding `count` default values.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let d = Deque::<u32>::with_len(3);
    /// assert_eq!(d, [0, 0, 0]);
    /// ```
    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        Self::with_len_in(count, Global)
    }

    /// Creates a `Deque` of `count` elements, element `i` being `make(i)`.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let d = Deque::from_fn(4, |i| i * i);
    /// assert_eq!(d, [0, 1, 4, 9]);
    /// ```
    pub fn from_fn<F>(count: usize, make: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self::from_fn_in(count, make, Global)
    }
}

impl<T, A: Allocator> Deque<T, A> {
    /// Creates a new, empty `Deque` that allocates from `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            len: 0,
            head: Slot::ORIGIN,
            tail: Slot::ORIGIN,
            map: Map::new(),
            alloc,
            marker: PhantomData,
        }
    }

    /// Like [`Deque::with_capacity`], allocating from `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::try_with_capacity_in(capacity, alloc).unwrap_or_else(|err| err.raise())
    }

    /// Creates an empty `Deque` with exactly enough buckets for `capacity`
    /// elements pushed at the back, or returns why it could not.
    ///
    /// Nothing is leaked when an allocation fails half-way.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, Error> {
        let buckets = capacity.div_ceil(BUCKET_CAPACITY);
        let map = Map::with_buckets(&alloc, buckets)?;
        let origin = if buckets == 0 {
            Slot::ORIGIN
        } else {
            Slot::new(0, 0)
        };

        Ok(Self {
            len: 0,
            head: origin,
            tail: origin,
            map,
            alloc,
            marker: PhantomData,
        })
    }

    /// Like [`Deque::from_elem`], allocating from `alloc`.
    pub fn from_elem_in(value: T, count: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut deque = Self::with_capacity_in(count, alloc);
        if count > 0 {
            for _ in 1..count {
                deque.push_back(value.clone());
            }
            deque.push_back(value);
        }
        deque
    }

    /// Like [`Deque::with_len`], allocating from `alloc`.
    pub fn with_len_in(count: usize, alloc: A) -> Self
    where
        T: Default,
    {
        Self::from_fn_in(count, |_| T::default(), alloc)
    }

    /// Like [`Deque::from_fn`], allocating from `alloc`.
    ///
    /// The buckets are allocated up front and filled from slot `(0, 0)`. If
    /// `make` panics, the elements built so far are dropped and all memory
    /// is returned to `alloc`.
    pub fn from_fn_in<F>(count: usize, mut make: F, alloc: A) -> Self
    where
        F: FnMut(usize) -> T,
    {
        let mut deque = Self::with_capacity_in(count, alloc);
        for index in 0..count {
            deque.emplace_back(|| make(index));
        }
        deque
    }

    /// Returns the number of elements.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of element slots currently allocated, spare
    /// buckets at both ends included.
    pub const fn capacity(&self) -> usize {
        self.map.capacity() * BUCKET_CAPACITY
    }

    /// Returns a reference to the underlying allocator.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    // --- element access

    /// Returns a reference to the element at `index`, or `None` if out of bounds.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let d = Deque::from([3, 4, 5]);
    /// assert_eq!(d.get(1), Some(&4));
    /// assert_eq!(d.get(3), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        (index < self.len).then(|| unsafe { self.get_unchecked(index) })
    }

    /// Returns a mutable reference to the element at `index`, or `None` if
    /// out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            Some(unsafe { self.get_unchecked_mut(index) })
        } else {
            None
        }
    }

    /// Returns a reference to the element at `index`, or
    /// [`Error::OutOfRange`] if `index >= len`.
    ///
    /// ```
    /// use bucket_deque::{Deque, Error};
    ///
    /// let d = Deque::from([1, 2, 3]);
    /// assert_eq!(d.at(2), Ok(&3));
    /// assert_eq!(d.at(5), Err(Error::OutOfRange { index: 5, len: 3 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len;
        self.get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Mutable counterpart of [`Deque::at`].
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len;
        self.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`Deque::len`].
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { &*self.map.slot_ptr(self.slot_of(index)) }
    }

    /// Returns a mutable reference to the element at `index` without bounds
    /// checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`Deque::len`].
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { &mut *self.map.slot_ptr(self.slot_of(index)) }
    }

    /// Returns the first element, or `None` if the deque is empty.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the first element mutably, or `None` if the deque is empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns the last element, or `None` if the deque is empty.
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns the last element mutably, or `None` if the deque is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len.checked_sub(1).and_then(|index| self.get_mut(index))
    }

    /// Resolves a logical index to its slot, without bounds checking.
    #[inline]
    fn slot_of(&self, index: usize) -> Slot {
        Slot::unflatten(self.head.flatten() + index)
    }

    // --- growth

    /// Makes sure the next push at the back cannot fail.
    ///
    /// On error the deque is left unchanged.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.try_reserve_back()?;
    /// d.push_back(1);
    /// # Ok::<(), bucket_deque::Error>(())
    /// ```
    pub fn try_reserve_back(&mut self) -> Result<(), Error> {
        let capacity = self.map.capacity();
        let exhausted = capacity == 0
            || (!self.is_empty() && self.tail == Slot::new(capacity - 1, BUCKET_CAPACITY - 1));

        if exhausted {
            self.grow()?;
        }
        Ok(())
    }

    /// Makes sure the next push at the front cannot fail.
    ///
    /// On error the deque is left unchanged.
    pub fn try_reserve_front(&mut self) -> Result<(), Error> {
        let exhausted =
            self.map.capacity() == 0 || (!self.is_empty() && self.head == Slot::new(0, 0));

        if exhausted {
            self.grow()?;
        }
        Ok(())
    }

    fn grow(&mut self) -> Result<(), Error> {
        let shift = self.map.grow(&self.alloc)?;
        self.head = self.head.shifted(shift);
        self.tail = self.tail.shifted(shift);
        Ok(())
    }

    // --- mutation

    /// Appends an element to the back of the deque.
    ///
    /// # Panics
    ///
    /// Panics if the deque needs to grow and the allocation fails.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d, [1, 2]);
    /// ```
    pub fn push_back(&mut self, element: T) {
        self.emplace_back(|| element);
    }

    /// Prepends an element to the front of the deque.
    ///
    /// # Panics
    ///
    /// Panics if the deque needs to grow and the allocation fails.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_front(1);
    /// d.push_front(2);
    /// assert_eq!(d, [2, 1]);
    /// ```
    pub fn push_front(&mut self, element: T) {
        self.emplace_front(|| element);
    }

    /// Appends the element built by `make` and returns a reference to it.
    ///
    /// Any growth happens before `make` runs. If `make` panics, the length
    /// and contents are unchanged.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::from([1]);
    /// *d.emplace_back(|| 2) += 40;
    /// assert_eq!(d, [1, 42]);
    /// ```
    pub fn emplace_back<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if let Err(err) = self.try_reserve_back() {
            err.raise();
        }

        let element = make();
        if !self.is_empty() {
            self.tail = self.tail.next();
        }

        self.len += 1;
        unsafe {
            let ptr = self.map.slot_ptr(self.tail);
            ptr.write(element);
            &mut *ptr
        }
    }

    /// Prepends the element built by `make` and returns a reference to it.
    ///
    /// Any growth happens before `make` runs. If `make` panics, the length
    /// and contents are unchanged.
    pub fn emplace_front<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if let Err(err) = self.try_reserve_front() {
            err.raise();
        }

        let element = make();
        if !self.is_empty() {
            self.head = self.head.prev();
        }

        self.len += 1;
        unsafe {
            let ptr = self.map.slot_ptr(self.head);
            ptr.write(element);
            &mut *ptr
        }
    }

    /// Removes the last element and returns it, or `None` if the deque is empty.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::from([1, 2, 3]);
    /// assert_eq!(d.pop_back(), Some(3));
    /// assert_eq!(d, [1, 2]);
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let element = unsafe { self.map.slot_ptr(self.tail).read() };

        self.len -= 1;
        if !self.is_empty() {
            self.tail = self.tail.prev();
        }

        Some(element)
    }

    /// Removes the first element and returns it, or `None` if the deque is empty.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::from([1, 2, 3]);
    /// assert_eq!(d.pop_front(), Some(1));
    /// assert_eq!(d, [2, 3]);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let element = unsafe { self.map.slot_ptr(self.head).read() };

        self.len -= 1;
        if !self.is_empty() {
            self.head = self.head.next();
        }

        Some(element)
    }

    /// Inserts an element at `index`, shifting the elements after it.
    ///
    /// Elements are shifted one swap at a time toward whichever end is
    /// closer, so the cost is O(min(index, len - index)). Repeatedly
    /// inserting in the middle is therefore quadratic overall.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the deque needs to grow and the
    /// allocation fails.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::from([1, 3]);
    /// d.insert(1, 2);
    /// d.insert(3, 4);
    /// assert_eq!(d, [1, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, index: usize, element: T) {
        self.insert_with(index, || element);
    }

    /// Inserts the element built by `make` at `index` and returns a reference
    /// to it. See [`Deque::insert`].
    pub fn insert_with<F>(&mut self, index: usize, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );

        if index < len - index {
            self.emplace_front(make);
            for k in 0..index {
                self.swap(k, k + 1);
            }
        } else {
            self.emplace_back(make);
            for k in (index..len).rev() {
                self.swap(k, k + 1);
            }
        }

        unsafe { self.get_unchecked_mut(index) }
    }

    /// Removes and returns the element at `index`, shifting the elements after
    /// it, or returns `None` if `index` is out of bounds.
    ///
    /// Like [`Deque::insert`], elements are shifted toward the closer end.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::from([10, 20, 30]);
    /// assert_eq!(d.remove(1), Some(20));
    /// assert_eq!(d, [10, 30]);
    /// assert_eq!(d.remove(2), None);
    /// ```
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        if index < self.len - 1 - index {
            for k in (0..index).rev() {
                self.swap(k, k + 1);
            }
            self.pop_front()
        } else {
            for k in index..self.len - 1 {
                self.swap(k, k + 1);
            }
            self.pop_back()
        }
    }

    /// Swaps the elements at indices `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len, "swap index (is {i}) should be < len (is {})", self.len);
        assert!(j < self.len, "swap index (is {j}) should be < len (is {})", self.len);

        unsafe {
            let a = self.map.slot_ptr(self.slot_of(i));
            let b = self.map.slot_ptr(self.slot_of(j));
            ptr::swap(a, b);
        }
    }

    /// Drops all elements. The buckets stay allocated.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let mut d = Deque::from([1, 2, 3]);
    /// let capacity = d.capacity();
    /// d.clear();
    /// assert!(d.is_empty());
    /// assert_eq!(d.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        // A panicking destructor leaks the remaining elements instead of
        // dropping any of them twice.
        let len = mem::replace(&mut self.len, 0);
        let head = self.head.flatten();
        self.tail = self.head;

        for flat in head..head + len {
            unsafe { ptr::drop_in_place(self.map.slot_ptr(Slot::unflatten(flat))) };
        }
    }

    // --- traversal

    /// Returns a front-to-back iterator over shared references.
    /// Call `.rev()` on it to traverse back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        let front = self.head.flatten();
        unsafe { Iter::new(self.map.as_ptr(), front, front + self.len) }
    }

    /// Returns a front-to-back iterator over mutable references.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let front = self.head.flatten();
        unsafe { IterMut::new(self.map.as_ptr(), front, front + self.len) }
    }

    /// Returns a cursor positioned at `index`; `index == len` is the end.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// ```
    /// use bucket_deque::Deque;
    ///
    /// let d = Deque::from([1, 2, 3, 4]);
    /// let mut cursor = d.cursor_at(1);
    /// cursor += 2;
    /// assert_eq!(cursor.current(), Some(&4));
    /// assert_eq!(d.cursor_end().offset_from(&cursor), 1);
    /// ```
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T> {
        let index = self.cursor_index(index);
        unsafe {
            Cursor::new(
                self.owner(),
                self.map.as_ptr(),
                self.head.flatten(),
                self.len,
                index,
            )
        }
    }

    /// Returns a cursor at the first element (the end, if empty).
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        self.cursor_at(0)
    }

    /// Returns a cursor at the last element (index `-1`, if empty).
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        let mut cursor = self.cursor_end();
        cursor.move_prev();
        cursor
    }

    /// Returns a cursor one past the last element.
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        self.cursor_at(self.len)
    }

    /// Returns a mutable cursor positioned at `index`; `index == len` is the end.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn cursor_at_mut(&mut self, index: usize) -> CursorMut<'_, T> {
        let index = self.cursor_index(index);
        unsafe {
            CursorMut::new(
                self.owner(),
                self.map.as_ptr(),
                self.head.flatten(),
                self.len,
                index,
            )
        }
    }

    /// Returns a mutable cursor at the first element (the end, if empty).
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        self.cursor_at_mut(0)
    }

    /// Returns a mutable cursor at the last element (index `-1`, if empty).
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T> {
        let mut cursor = self.cursor_end_mut();
        cursor.move_prev();
        cursor
    }

    /// Returns a mutable cursor one past the last element.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        self.cursor_at_mut(self.len)
    }

    fn cursor_index(&self, index: usize) -> isize {
        assert!(
            index <= self.len,
            "cursor index (is {index}) should be <= len (is {})",
            self.len
        );
        index as isize
    }

    fn owner(&self) -> *const () {
        (self as *const Self).cast()
    }
}

impl<T, A> Default for Deque<T, A>
where
    A: Allocator + Default,
{
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A> Clone for Deque<T, A>
where
    T: Clone,
    A: Allocator + Clone,
{
    fn clone(&self) -> Self {
        let mut deque = Self::with_capacity_in(self.len, self.alloc.clone());
        deque.extend(self.iter().cloned());
        deque
    }
}

impl<T, A: Allocator> Drop for Deque<T, A> {
    fn drop(&mut self) {
        struct Release<'a, T, A: Allocator> {
            map: &'a mut Map<T>,
            alloc: &'a A,
        }

        impl<T, A: Allocator> Drop for Release<'_, T, A> {
            fn drop(&mut self) {
                unsafe { self.map.release(self.alloc) };
            }
        }

        // Buckets are freed even if an element's destructor panics.
        let len = mem::replace(&mut self.len, 0);
        let head = self.head.flatten();
        let guard = Release {
            map: &mut self.map,
            alloc: &self.alloc,
        };

        for flat in head..head + len {
            unsafe { ptr::drop_in_place(guard.map.slot_ptr(Slot::unflatten(flat))) };
        }
    }
}

impl<T, A: Allocator> Index<usize> for Deque<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(element) => element,
            None => panic!("index out of bounds: the len is {} but the index is {index}", self.len),
        }
    }
}

impl<T, A: Allocator> IndexMut<usize> for Deque<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len;
        match self.get_mut(index) {
            Some(element) => element,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T, A: Allocator> Extend<T> for Deque<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|element| self.push_back(element));
    }
}

impl<'a, T, A> Extend<&'a T> for Deque<T, A>
where
    T: Copy + 'a,
    A: Allocator,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut deque = Self::with_capacity(iter.size_hint().0);
        deque.extend(iter);
        deque
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    fn from(value: [T; N]) -> Self {
        let mut deque = Self::with_capacity(N);
        deque.extend(value);
        deque
    }
}

impl<T> From<alloc::vec::Vec<T>> for Deque<T> {
    fn from(value: alloc::vec::Vec<T>) -> Self {
        Self::from_iter(value)
    }
}

impl<T, A: Allocator> IntoIterator for Deque<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Deque<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Deque<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, U, A, B> PartialEq<Deque<U, B>> for Deque<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
    B: Allocator,
{
    fn eq(&self, other: &Deque<U, B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, U, A> PartialEq<[U]> for Deque<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &[U]) -> bool {
        self.len == other.len() && self.iter().eq(other)
    }
}

impl<T, U, A> PartialEq<&[U]> for Deque<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &&[U]) -> bool {
        *self == **other
    }
}

impl<T, U, A, const N: usize> PartialEq<[U; N]> for Deque<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &[U; N]) -> bool {
        *self == other[..]
    }
}

impl<T, U, A, const N: usize> PartialEq<&[U; N]> for Deque<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &&[U; N]) -> bool {
        *self == other[..]
    }
}

impl<T: Eq, A: Allocator> Eq for Deque<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for Deque<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, A: Allocator> Ord for Deque<T, A> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, A: Allocator> Hash for Deque<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        self.iter().for_each(|element| element.hash(state));
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Deque<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

unsafe impl<T: Send, A: Allocator + Send> Send for Deque<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Deque<T, A> {}
