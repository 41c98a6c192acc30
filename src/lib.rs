//! A general-purpose dynamic memory allocator for bare-metal and embedded
//! systems where no host heap exists.
//!
//! This crate provides two public types: [`Heap`], a multi-region allocator
//! you hand one or more contiguous byte ranges to at startup, and
//! [`Allocator`], a single-buffer convenience wrapper around `Heap` sized by
//! a const generic, for the common case of "just give me a `static` heap of
//! `N` bytes". Both implement [`core::alloc::GlobalAlloc`], so either can be
//! used as `#[global_allocator]` on `#![no_std]` targets.
//!
//! # Usage
//! The simplest usage is the single-buffer form. Declare a static allocator,
//! initialize it once during startup, and install it as the global
//! allocator:
//! ```
//! #[global_allocator]
//! static ALLOCATOR: regionheap::Allocator<4096> = regionheap::Allocator::new();
//!
//! fn startup() {
//!     ALLOCATOR.init();
//! }
//!
//! extern crate alloc;
//! ```
//! Afterwards you can just `use alloc::vec::Vec` or even
//! `use alloc::collections::BTreeMap`, i.e. every fancy collection normally
//! provided by `std`.
//!
//! The minimal buffer size is `2 * size_of::<usize>() * 2`, enough for one
//! header and one minimal allocation. Adjust the size as necessary, e.g. by
//! doing a worst-case calculation and potentially adding some backup space
//! of 10% (for example).
//!
//! For the bare-metal case of several physically discontiguous RAM regions
//! (or regions separated by a reserved hole), use [`Heap`] directly and hand
//! it every region up front:
//! ```
//! use regionheap::{Heap, MemoryRegion};
//!
//! static mut LOW_MEM: [u8; 1024] = [0; 1024];
//! static mut HIGH_MEM: [u8; 4096] = [0; 4096];
//!
//! #[global_allocator]
//! static ALLOCATOR: Heap = Heap::new();
//!
//! fn startup() {
//!     // SAFETY: these statics are not accessed anywhere else.
//!     let regions = unsafe {
//!         [
//!             MemoryRegion::from_raw_parts(core::ptr::addr_of_mut!(LOW_MEM).cast(), 1024),
//!             MemoryRegion::from_raw_parts(core::ptr::addr_of_mut!(HIGH_MEM).cast(), 4096),
//!         ]
//!     };
//!     ALLOCATOR.init(&regions);
//! }
//! ```
//!
//! Note to users with things like `MPU`s, `MMU`s, etc.: your device might
//! support things like memory remapping or memory protection with setting
//! read/write/execution rights. This crate _doesn't use_ those features at
//! all! If that is desired, you should take the address of a region and use
//! that along with its known length to protect the heap memory.
//!
//! # Implementation
//! Every managed byte range begins with an in-band, two-word header: a
//! `next` link (for free blocks, the next free block in address order; for
//! allocated blocks, null) and a `size` (the block's full span, header
//! included, with the top bit stolen to mark the block allocated). Free
//! blocks live on a single, strictly address-ordered, singly linked list
//! anchored at a head dummy and terminated by a zero-sized tail sentinel.
//! When more than one region is admitted, each region's own tail sentinel is
//! patched to point at the next region's leading block, fusing every region
//! into one logical list — allocation never straddles a sentinel that
//! wasn't stitched this way, so there is no accidental cross-region merging.
//!
//! Allocation walks the free list for the first block large enough (first
//! fit); if the leftover tail after carving off the request is bigger than
//! twice the header size, it is split off and reinserted as its own free
//! block, otherwise the whole block (including the small leftover) is
//! handed to the caller as internal fragmentation. Freeing clears the
//! allocated bit and walks the list once to find the free block's sorted
//! position, eagerly merging with whichever of its neighbours are free and
//! adjacent in memory. Resizing never shrinks or grows a block in place: it
//! always allocates fresh, copies the overlapping prefix, and releases the
//! original.
#![cfg_attr(not(test), no_std)]
#![warn(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]

mod header;
mod heap;
mod raw_allocator;
mod region;

pub use heap::Heap;
pub use region::MemoryRegion;

use core::alloc::{GlobalAlloc, Layout};
use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

/// A single-buffer memory allocator for embedded systems.
///
/// This is the convenience entry point for the common case: a statically
/// sized heap carved out of `.bss`, with no other regions to manage. It is a
/// thin wrapper around [`Heap`] whose sole region is its own backing buffer.
///
/// Usage is simple: declare a `static`, call [`Allocator::init`] once during
/// startup, and apply `#[global_allocator]`:
/// ```no_run
/// #[global_allocator]
/// static ALLOCATOR: regionheap::Allocator<4096> = regionheap::Allocator::new();
///
/// ALLOCATOR.init();
/// ```
/// Until `init` has been called, [`GlobalAlloc::alloc`] returns a null
/// pointer, matching this crate's general rule that an uninitialized heap
/// never serves an allocation.
pub struct Allocator<const N: usize> {
    heap: Heap,
    memory: UnsafeCell<[MaybeUninit<u8>; N]>,
}

// SAFETY: the only non-`Sync` field is `memory`, an `UnsafeCell` that is
// never read or written except through the region handed to `heap`, which
// itself serializes access with a `spin::Mutex`.
unsafe impl<const N: usize> Sync for Allocator<N> {}

impl<const N: usize> Allocator<N> {
    /// Create a new [`Allocator`]. Its backing buffer is not admitted into
    /// the heap until [`Allocator::init`] is called.
    ///
    /// This function is a `const fn`, so it can be assigned directly to a
    /// `static`.
    #[must_use = "assign the allocator to a static variable and call `init` before use"]
    pub const fn new() -> Self {
        Self {
            heap: Heap::new(),
            memory: UnsafeCell::new([MaybeUninit::uninit(); N]),
        }
    }

    /// Admit this allocator's backing buffer as its sole region. Must be
    /// called exactly once, before the allocator serves any request;
    /// subsequent calls are no-ops that return `0`, matching [`Heap::init`]'s
    /// own reinitialization rule.
    ///
    /// Returns `1` if the buffer was large enough to admit, `0` otherwise
    /// (already initialized, or `N` too small to hold a header and a
    /// minimal allocation).
    pub fn init(&self) -> usize {
        // SAFETY: `self.memory` is owned exclusively by this allocator from
        // this point on; nothing else holds a reference to it, and `Heap`
        // serializes every subsequent access behind its own mutex.
        let region = unsafe {
            MemoryRegion::from_raw_parts(self.memory.get().cast::<u8>(), N)
        };
        self.heap.init(&[region])
    }

    /// Bytes currently reachable on the free list. See [`Heap::available_bytes`].
    pub fn available_bytes(&self) -> usize {
        self.heap.available_bytes()
    }
}

impl<const N: usize> Default for Allocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: the safety contract of `GlobalAlloc` is lengthy, but in short: the
// implementation does not panic (if it did, that would be a bug) and the
// returned pointers satisfy the requested layout (ensured by `Heap`'s own
// alignment handling and by the tests below).
unsafe impl<const N: usize> GlobalAlloc for Allocator<N> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.heap.alloc_layout(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.heap.dealloc_layout(ptr, layout)
    }
}
