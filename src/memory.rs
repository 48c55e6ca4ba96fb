//! Pluggable allocation for the decoder's large buffers.
//!
//! A session may supply an allocation hook pair at creation time. When it
//! does, the sliding window, context maps and Huffman tables are all
//! obtained from those hooks; otherwise they come from the global allocator.
//! [`MemBlock`] hides the difference behind a plain slice.

use core::fmt;
use core::mem::{align_of, size_of};
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

use libc::{c_void, size_t};

use crate::decode::types::BrotliError;

/// Allocation hook: returns a block of at least `size` bytes, or null.
pub type BrotliAllocFunc = unsafe extern "C" fn(opaque: *mut c_void, size: size_t) -> *mut c_void;

/// Release hook: frees a block previously returned by the paired
/// [`BrotliAllocFunc`]. Never called with null.
pub type BrotliFreeFunc = unsafe extern "C" fn(opaque: *mut c_void, address: *mut c_void);

/// Custom memory allocator hooks.
///
/// Either both hooks are set or neither; [`CustomMem::new`] rejects a
/// half-specified pair with [`BrotliError::InvalidParameter`].
#[derive(Clone, Copy)]
pub struct CustomMem {
    pub alloc_fn: Option<BrotliAllocFunc>,
    pub free_fn: Option<BrotliFreeFunc>,
    /// Opaque state pointer passed to both hooks.
    pub opaque: *mut c_void,
}

// SAFETY: the hooks are plain function pointers; `opaque` is only ever
// handed back to them, and the caller that installed them vouches for
// their thread safety by moving a session across threads.
unsafe impl Send for CustomMem {}
unsafe impl Sync for CustomMem {}

impl Default for CustomMem {
    fn default() -> Self {
        CustomMem {
            alloc_fn: None,
            free_fn: None,
            opaque: core::ptr::null_mut(),
        }
    }
}

impl fmt::Debug for CustomMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomMem")
            .field("alloc_fn", &self.alloc_fn.map(|_| "<fn>"))
            .field("free_fn", &self.free_fn.map(|_| "<fn>"))
            .field("opaque", &self.opaque)
            .finish()
    }
}

impl CustomMem {
    /// Validates a hook pair. Both or neither must be present.
    pub fn new(
        alloc_fn: Option<BrotliAllocFunc>,
        free_fn: Option<BrotliFreeFunc>,
        opaque: *mut c_void,
    ) -> Result<Self, BrotliError> {
        if alloc_fn.is_some() != free_fn.is_some() {
            return Err(BrotliError::InvalidParameter);
        }
        Ok(CustomMem { alloc_fn, free_fn, opaque })
    }

    /// `true` when allocations are routed through caller hooks.
    #[inline]
    pub fn is_custom(&self) -> bool {
        self.alloc_fn.is_some()
    }

    /// Allocates `bytes` raw bytes through the hook.
    ///
    /// # Safety
    /// `self` must carry a valid hook pair.
    pub(crate) unsafe fn alloc_raw(&self, bytes: usize) -> *mut c_void {
        match self.alloc_fn {
            Some(alloc) => alloc(self.opaque, bytes),
            None => core::ptr::null_mut(),
        }
    }

    /// Releases a block obtained from [`CustomMem::alloc_raw`].
    ///
    /// # Safety
    /// `ptr` must have come from this hook pair and not been freed yet.
    pub(crate) unsafe fn free_raw(&self, ptr: *mut c_void) {
        if let Some(free) = self.free_fn {
            if !ptr.is_null() {
                free(self.opaque, ptr);
            }
        }
    }
}

enum Origin {
    Global,
    Custom(CustomMem),
}

/// A fixed-length, default-initialised buffer owned by one session.
pub struct MemBlock<T: Copy + Default> {
    ptr: NonNull<T>,
    len: usize,
    origin: Origin,
}

// SAFETY: MemBlock uniquely owns its elements, like Box<[T]>.
unsafe impl<T: Copy + Default + Send> Send for MemBlock<T> {}

impl<T: Copy + Default> MemBlock<T> {
    /// An empty block; owns nothing.
    pub fn empty() -> Self {
        MemBlock {
            ptr: NonNull::dangling(),
            len: 0,
            origin: Origin::Global,
        }
    }

    /// Allocates `len` elements set to `T::default()`.
    pub fn new(mem: &CustomMem, len: usize) -> Result<Self, BrotliError> {
        if len == 0 {
            return Ok(Self::empty());
        }
        if !mem.is_custom() {
            let boxed: Box<[T]> = vec![T::default(); len].into_boxed_slice();
            let raw = Box::into_raw(boxed) as *mut T;
            // SAFETY: Box::into_raw never returns null.
            let ptr = unsafe { NonNull::new_unchecked(raw) };
            return Ok(MemBlock { ptr, len, origin: Origin::Global });
        }

        let bytes = len
            .checked_mul(size_of::<T>())
            .ok_or(BrotliError::AllocationFailed)?;
        // SAFETY: the hook pair was validated by CustomMem::new.
        let raw = unsafe { mem.alloc_raw(bytes) } as *mut T;
        let ptr = NonNull::new(raw).ok_or(BrotliError::AllocationFailed)?;
        if (raw as usize) % align_of::<T>() != 0 {
            // SAFETY: raw came from alloc_raw just above.
            unsafe { mem.free_raw(raw as *mut c_void) };
            return Err(BrotliError::AllocationFailed);
        }
        for i in 0..len {
            // SAFETY: the block holds `len` properly aligned elements.
            unsafe { raw.add(i).write(T::default()) };
        }
        Ok(MemBlock { ptr, len, origin: Origin::Custom(*mem) })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resets every element to `T::default()`.
    pub fn clear(&mut self) {
        self.fill(T::default());
    }
}

impl<T: Copy + Default> Default for MemBlock<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Copy + Default> Deref for MemBlock<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialised elements (or dangling with len 0).
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy + Default> DerefMut for MemBlock<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees uniqueness.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy + Default> Drop for MemBlock<T> {
    fn drop(&mut self) {
        if self.len == 0 {
            return;
        }
        match &self.origin {
            Origin::Global => {
                let slice = core::ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len);
                // SAFETY: produced by Box::into_raw with the same length.
                drop(unsafe { Box::from_raw(slice) });
            }
            Origin::Custom(mem) => {
                // SAFETY: produced by mem.alloc_raw; T is Copy so no element drops.
                unsafe { mem.free_raw(self.ptr.as_ptr() as *mut c_void) };
            }
        }
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for MemBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemBlock")
            .field("len", &self.len)
            .field("custom", &matches!(self.origin, Origin::Custom(_)))
            .finish()
    }
}
