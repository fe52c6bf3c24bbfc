//! Buffered byte input.
//!
//! [`ByteSource`] owns the underlying reader and a fixed-size read buffer. It
//! hands bytes to the tokenizer one at a time (or a chunk at a time through
//! [`ByteSource::next_chunk`]), strips a leading UTF-8 byte-order mark and
//! keeps the absolute stream offset used in error positions.
//!
//! Dropping the source drops the reader, so a file handle is closed on every
//! exit path, including a host that stops reading halfway through.

use std::io::{self, Read};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A chunked reader over any [`Read`] implementation.
pub struct ByteSource<R> {
    reader: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    // Stream offset of buf[0].
    base: u64,
    started: bool,
    eof: bool,
}

impl<R: Read> ByteSource<R> {
    /// Creates a source reading `capacity` bytes at a time.
    ///
    /// Capacities below four bytes are raised to four so the byte-order mark
    /// always fits in the first chunk.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        ByteSource {
            reader,
            buf: vec![0; capacity.max(UTF8_BOM.len() + 1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            base: 0,
            started: false,
            eof: false,
        }
    }

    /// Returns the unread part of the current chunk, reading a new chunk if
    /// the current one is used up. `None` means end of input.
    ///
    /// The returned bytes stay unread; call [`ByteSource::consume`] to
    /// advance past them.
    ///
    /// # Errors
    ///
    /// Returns the underlying reader's error. Interrupted reads are retried.
    pub fn next_chunk(&mut self) -> io::Result<Option<&[u8]>> {
        if self.pos == self.len && !self.fill()? {
            return Ok(None);
        }
        Ok(Some(&self.buf[self.pos..self.len]))
    }

    /// Marks `amount` bytes of the current chunk as read.
    pub fn consume(&mut self, amount: usize) {
        self.pos = (self.pos + amount).min(self.len);
    }

    #[inline]
    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.len && !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.buf[self.pos]))
    }

    #[inline]
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    /// Completes a line break whose first byte was `first`: a CR directly
    /// followed by LF is one break, so the LF is consumed too.
    pub fn finish_line_break(&mut self, first: u8) -> io::Result<()> {
        if first == b'\r' && self.peek_byte()? == Some(b'\n') {
            self.pos += 1;
        }
        Ok(())
    }

    /// Stream offset of the next unread byte.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    /// Releases the underlying reader. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }

        if !self.started {
            self.started = true;
            // A BOM may straddle several short reads.
            while self.len < UTF8_BOM.len() {
                let n = self.read_into(self.len)?;
                if n == 0 {
                    break;
                }
                self.len += n;
            }
            if self.buf[..self.len].starts_with(&UTF8_BOM) {
                self.pos = UTF8_BOM.len();
            }
            if self.pos < self.len {
                return Ok(true);
            }
        }

        self.base += self.len as u64;
        self.pos = 0;
        self.len = self.read_into(0)?;
        if self.len == 0 {
            self.eof = true;
            return Ok(false);
        }
        Ok(true)
    }

    fn read_into(&mut self, at: usize) -> io::Result<usize> {
        loop {
            match self.reader.read(&mut self.buf[at..]) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
