//! Scoped ownership of out-of-band allocations

use std::fmt;

type Release<T> = Box<dyn FnOnce(T) + Send>;

/// Value paired with the function that must release it.
///
/// The release runs exactly once: on [`OwnedBuffer::release`], on
/// [`OwnedBuffer::into_inner`] after copying the value out, or on drop.
pub struct OwnedBuffer<T> {
    inner: Option<(T, Release<T>)>,
}

impl<T> OwnedBuffer<T> {
    pub fn new(value: T, release: impl FnOnce(T) + Send + 'static) -> Self {
        Self {
            inner: Some((value, Box::new(release))),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.inner.as_ref().map(|(value, _)| value)
    }

    /// Copy the value out, then release the original
    pub fn into_inner(mut self) -> Option<T>
    where
        T: Clone,
    {
        let (value, release) = self.inner.take()?;
        let copy = value.clone();
        release(value);
        Some(copy)
    }

    pub fn release(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some((value, release)) = self.inner.take() {
            release(value);
        }
    }
}

impl<T> Drop for OwnedBuffer<T> {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedBuffer")
            .field("value", &self.get())
            .finish()
    }
}
