/// Backing storage for a [`Matrix`](crate::Matrix).
///
/// The variant is the ownership flag: an `Owned` buffer is released when the
/// matrix drops, a `Borrowed` one aliases memory whose lifetime is managed by
/// the caller and is never released here.
#[derive(Debug)]
pub enum Buffer<'a, T> {
    /// Storage allocated by (or handed over to) the matrix.
    Owned(Vec<T>),
    /// Externally managed storage, wrapped without copying.
    Borrowed(&'a mut [T]),
}

impl<'a, T> Buffer<'a, T> {
    /// The empty, non-owning state left behind by a move.
    pub fn detached() -> Self {
        Buffer::Borrowed(Default::default())
    }

    /// Number of elements in this buffer.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if dropping this buffer releases its memory.
    pub fn is_owned(&self) -> bool {
        matches!(self, Buffer::Owned(_))
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Buffer::Owned(v) => v.as_slice(),
            Buffer::Borrowed(s) => s,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Buffer::Owned(v) => v.as_mut_slice(),
            Buffer::Borrowed(s) => s,
        }
    }

    /// Converts into an owned buffer, copying borrowed contents.
    pub fn into_owned(self) -> Vec<T>
    where
        T: Clone,
    {
        match self {
            Buffer::Owned(v) => v,
            Buffer::Borrowed(s) => s.to_vec(),
        }
    }
}

impl<T> Default for Buffer<'_, T> {
    /// An empty owned buffer. See [`Buffer::detached`] for the moved-from state.
    fn default() -> Self {
        Buffer::Owned(Vec::new())
    }
}
