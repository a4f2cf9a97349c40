//! Test-only allocator that counts live allocations and can be told to fail.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use allocator_api2::alloc::{AllocError, Allocator, Global};

#[derive(Debug, Default)]
pub(crate) struct TestAlloc {
    live: Cell<usize>,
    budget: Cell<Option<usize>>,
}

impl TestAlloc {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An allocator that serves `count` more requests and refuses the rest.
    pub(crate) fn failing_after(count: usize) -> Self {
        let alloc = Self::new();
        alloc.set_budget(Some(count));
        alloc
    }

    pub(crate) fn set_budget(&self, budget: Option<usize>) {
        self.budget.set(budget);
    }

    /// Number of allocations not yet returned.
    pub(crate) fn live(&self) -> usize {
        self.live.get()
    }
}

unsafe impl Allocator for TestAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if let Some(budget) = self.budget.get() {
            if budget == 0 {
                return Err(AllocError);
            }
            self.budget.set(Some(budget - 1));
        }

        let ptr = Global.allocate(layout)?;
        self.live.set(self.live.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.set(self.live.get() - 1);
        unsafe { Global.deallocate(ptr, layout) };
    }
}
