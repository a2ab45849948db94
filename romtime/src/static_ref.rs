// Licensed under the Apache-2.0 license

use core::ops::Deref;

/// A pointer to memory-mapped registers (or any statically placed object)
/// that can be dereferenced safely once constructed.
#[derive(Debug)]
pub struct StaticRef<T> {
    ptr: *const T,
}

impl<T> StaticRef<T> {
    /// # Safety
    ///
    /// `ptr` must be aligned, non-null and point to a `T` that stays valid
    /// for the rest of the program.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef { ptr }
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T> Deref for StaticRef<T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.ptr }
    }
}
