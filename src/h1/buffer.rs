use bytes::{Buf, BytesMut};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

const MIN_GROW: usize = 64;

/// Growable read buffer.
///
/// Bytes read from IO are appended after the unconsumed content. [`consume`] drops a prefix once
/// the parser is done with it; the freed space at the front is reclaimed by shifting the remaining
/// bytes left on the next growth, so the total copying stays linear in the bytes read.
///
/// [`consume`]: ReadBuffer::consume
#[derive(Debug)]
pub struct ReadBuffer {
    buffer: BytesMut,
    limit: usize,
}

impl ReadBuffer {
    /// Create new buffer with initial `capacity`.
    ///
    /// `limit` bounds the size of a request head read through this buffer.
    pub fn new(capacity: usize, limit: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            limit,
        }
    }

    /// Returns the unconsumed bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the number of unconsumed bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if there is no unconsumed byte.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the maximum request head size.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the total number of bytes the buffer can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Drop the first `n` unconsumed bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` is larger than [`len`][ReadBuffer::len].
    #[inline]
    pub fn consume(&mut self, n: usize) {
        self.buffer.advance(n);
    }

    /// Append bytes without IO.
    #[inline]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Read once from `io`, growing the buffer when it is full.
    ///
    /// Returns the number of bytes read, `0` means end of stream.
    pub async fn read_from<R>(&mut self, io: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        if self.buffer.len() == self.buffer.capacity() {
            let additional = self.buffer.capacity().max(MIN_GROW);
            self.buffer.reserve(additional);
        }
        io.read_buf(&mut self.buffer).await
    }

    /// Take the unconsumed bytes, leaving the buffer empty.
    #[inline]
    pub fn split(&mut self) -> BytesMut {
        self.buffer.split()
    }
}
