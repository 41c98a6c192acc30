//! Caller-supplied memory regions handed to [`crate::Heap::init`].

use core::mem::MaybeUninit;
use core::ptr::NonNull;

/// A single contiguous byte range the allocator will manage.
///
/// The common case is a `'static mut` byte array the caller already owns, in
/// which case [`MemoryRegion::from_slice`] hands the allocator exclusive
/// custody of it and the borrow checker enforces that the caller never
/// touches it again. For the genuinely bare-metal case — memory described
/// only by a linker-script symbol or an MMIO-mapped range with no Rust
/// binding yet — [`MemoryRegion::from_raw_parts`] accepts an address and
/// length directly.
pub struct MemoryRegion {
    pub(crate) base: NonNull<u8>,
    pub(crate) len: usize,
}

impl MemoryRegion {
    /// Build a region from an owned, `'static` byte slice.
    ///
    /// The slice is not required to be aligned or sized to the allocator's
    /// alignment constant; [`crate::Heap::init`] normalizes both, dropping
    /// the region silently if nothing usable remains after normalization.
    pub fn from_slice(slice: &'static mut [MaybeUninit<u8>]) -> Self {
        let len = slice.len();
        // SAFETY: `slice` is non-null by virtue of being a valid reference.
        let base = unsafe { NonNull::new_unchecked(slice.as_mut_ptr().cast::<u8>()) };
        Self { base, len }
    }

    /// Build a region from a raw base address and a byte length.
    ///
    /// # Safety
    /// `base` must be valid for reads and writes for `len` bytes for as long
    /// as the allocator that admits this region remains in use, and no other
    /// code may access that range afterwards.
    pub unsafe fn from_raw_parts(base: *mut u8, len: usize) -> Self {
        // SAFETY: forwarded to the caller's safety contract.
        let base = unsafe { NonNull::new_unchecked(base) };
        Self { base, len }
    }

    pub(crate) fn start_addr(&self) -> usize {
        self.base.as_ptr() as usize
    }

    pub(crate) fn end_addr(&self) -> usize {
        self.start_addr() + self.len
    }
}
