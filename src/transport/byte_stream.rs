//! Flow-controlled in-memory byte stream
//!
//! A [`ByteStream`] is a bounded FIFO of bytes. The writing side pushes through
//! a [`Writer`] view, the reading side peeks and pops through a [`Reader`]
//! view. Both views deref to the stream for the read-only queries.
//!
//! Nothing here fails: pushes beyond capacity are truncated, pops beyond the
//! buffered amount are clamped, and pushes after `close` are ignored.

use std::collections::VecDeque;
use std::io;
use std::ops::Deref;

/// Bounded, ordered byte buffer with end-of-stream and error signalling.
#[derive(Debug, Clone)]
pub struct ByteStream {
    capacity: u64,
    /// Accepted pushes, one chunk each
    chunks: VecDeque<Vec<u8>>,
    /// Bytes already consumed from the front chunk
    front_offset: usize,
    bytes_pushed: u64,
    bytes_popped: u64,
    closed: bool,
    error: bool,
}

impl ByteStream {
    pub fn new(capacity: u64) -> Self {
        ByteStream {
            capacity,
            chunks: VecDeque::new(),
            front_offset: 0,
            bytes_pushed: 0,
            bytes_popped: 0,
            closed: false,
            error: false,
        }
    }

    /// Write-side view.
    pub fn writer(&mut self) -> Writer<'_> {
        Writer { stream: self }
    }

    /// Read-side view.
    pub fn reader(&mut self) -> Reader<'_> {
        Reader { stream: self }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn available_capacity(&self) -> u64 {
        self.capacity - self.bytes_buffered()
    }

    pub fn bytes_pushed(&self) -> u64 {
        self.bytes_pushed
    }

    pub fn bytes_popped(&self) -> u64 {
        self.bytes_popped
    }

    pub fn bytes_buffered(&self) -> u64 {
        self.bytes_pushed - self.bytes_popped
    }

    /// Closed and fully drained: nothing more will ever be readable.
    pub fn is_finished(&self) -> bool {
        self.closed && self.bytes_buffered() == 0
    }

    /// Next contiguous run of buffered bytes, without consuming them.
    ///
    /// This may be only a prefix of everything buffered; call again after
    /// popping to see the rest. Empty when nothing is buffered.
    pub fn peek(&self) -> &[u8] {
        match self.chunks.front() {
            Some(chunk) => &chunk[self.front_offset..],
            None => &[],
        }
    }

    fn push(&mut self, data: &[u8]) {
        if self.closed || data.is_empty() {
            return;
        }
        let accepted = (data.len() as u64).min(self.available_capacity()) as usize;
        if accepted == 0 {
            return;
        }
        self.chunks.push_back(data[..accepted].to_vec());
        self.bytes_pushed += accepted as u64;
    }

    fn pop(&mut self, len: u64) {
        let mut remaining = len.min(self.bytes_buffered());
        self.bytes_popped += remaining;

        while remaining > 0 {
            let Some(front) = self.chunks.front() else {
                break;
            };
            let left_in_front = (front.len() - self.front_offset) as u64;
            if left_in_front <= remaining {
                self.chunks.pop_front();
                self.front_offset = 0;
                remaining -= left_in_front;
            } else {
                self.front_offset += remaining as usize;
                remaining = 0;
            }
        }
    }
}

/// Write-side view of a [`ByteStream`].
#[derive(Debug)]
pub struct Writer<'a> {
    stream: &'a mut ByteStream,
}

impl Writer<'_> {
    /// Push as much of `data` as fits; the rest is dropped.
    pub fn push(&mut self, data: &[u8]) {
        self.stream.push(data);
    }

    /// Signal that no more bytes will be pushed. Idempotent.
    pub fn close(&mut self) {
        self.stream.closed = true;
    }

    pub fn set_error(&mut self) {
        self.stream.error = true;
    }
}

impl Deref for Writer<'_> {
    type Target = ByteStream;

    fn deref(&self) -> &ByteStream {
        self.stream
    }
}

/// `write` reports how many bytes were accepted, which is `0` once the stream
/// is full or closed.
impl io::Write for Writer<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let before = self.stream.bytes_pushed();
        self.push(buf);
        Ok((self.stream.bytes_pushed() - before) as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read-side view of a [`ByteStream`].
#[derive(Debug)]
pub struct Reader<'a> {
    stream: &'a mut ByteStream,
}

impl Reader<'_> {
    /// Discard up to `len` bytes from the front.
    pub fn pop(&mut self, len: u64) {
        self.stream.pop(len);
    }

    pub fn set_error(&mut self) {
        self.stream.error = true;
    }
}

impl Deref for Reader<'_> {
    type Target = ByteStream;

    fn deref(&self) -> &ByteStream {
        self.stream
    }
}

impl io::Read for Reader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut copied = 0;
        while copied < buf.len() {
            let chunk = self.stream.peek();
            if chunk.is_empty() {
                break;
            }
            let n = chunk.len().min(buf.len() - copied);
            buf[copied..copied + n].copy_from_slice(&chunk[..n]);
            self.stream.pop(n as u64);
            copied += n;
        }
        Ok(copied)
    }
}

/// Move up to `max_len` bytes out of the stream into `out`.
pub fn read(reader: &mut Reader<'_>, max_len: u64, out: &mut Vec<u8>) {
    let mut remaining = max_len;
    while remaining > 0 {
        let chunk = reader.peek();
        if chunk.is_empty() {
            break;
        }
        let n = (chunk.len() as u64).min(remaining) as usize;
        out.extend_from_slice(&chunk[..n]);
        reader.pop(n as u64);
        remaining -= n as u64;
    }
}
