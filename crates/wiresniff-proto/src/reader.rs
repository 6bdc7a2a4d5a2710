//! Forward-only cursor reader over an IPC body.
//!
//! Every decoder receives a [`BufferReader`] positioned at the start of its
//! segment's IPC body and pulls fields out sequentially with the `next_*`
//! methods. There is no way to seek backwards or re-read a field: decoders
//! are written the same way the wire layout is written, top to bottom.
//!
//! Reads that run past the end of the underlying slice do not panic or
//! error. They return a zero-filled value and flip [`BufferReader::is_truncated`]
//! so the caller can decide whether to keep or discard the record. This
//! mirrors how hand-written decoders for this protocol are forced to behave
//! in the field: a single off-by-one in a segment length must not be able to
//! take down the whole capture pipeline.

/// Soft cap on how many bytes [`BufferReader::next_string`] will scan for a
/// NUL terminator before giving up and returning what it has.
pub const STRING_SOFT_CAP: usize = 512;

/// A forward-only, zero-allocation cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct BufferReader<'a> {
    data: &'a [u8],
    pos: usize,
    truncated: bool,
}

impl<'a> BufferReader<'a> {
    /// Wrap a byte slice for sequential reading from offset zero.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, truncated: false }
    }

    /// Current cursor offset into the underlying slice.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes remaining before the cursor runs off the end of the slice.
    ///
    /// Saturates to zero once the cursor has already been pushed past the
    /// end by a previous short read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Whether any read so far has run past the end of the slice.
    ///
    /// Once set, it never clears — a truncated record should be treated as
    /// suspect from the first short read onward, not just at the final
    /// field.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Read `N` bytes, zero-padding and marking truncation on short input.
    fn next_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut buf = [0u8; N];
        let available = self.data.len().saturating_sub(self.pos);
        let to_copy = available.min(N);
        if to_copy < N {
            self.truncated = true;
        }
        if to_copy > 0 {
            buf[..to_copy].copy_from_slice(&self.data[self.pos..self.pos + to_copy]);
        }
        self.pos += N;
        buf
    }

    /// Read an unsigned 8-bit value.
    pub fn next_u8(&mut self) -> u8 {
        self.next_bytes::<1>()[0]
    }

    /// Read a little-endian unsigned 16-bit value.
    pub fn next_u16(&mut self) -> u16 {
        u16::from_le_bytes(self.next_bytes())
    }

    /// Read a little-endian unsigned 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.next_bytes())
    }

    /// Read a little-endian unsigned 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.next_bytes())
    }

    /// Read a signed 8-bit value.
    pub fn next_i8(&mut self) -> i8 {
        self.next_bytes::<1>()[0] as i8
    }

    /// Read a little-endian signed 16-bit value.
    pub fn next_i16(&mut self) -> i16 {
        i16::from_le_bytes(self.next_bytes())
    }

    /// Read a little-endian signed 32-bit value.
    pub fn next_i32(&mut self) -> i32 {
        i32::from_le_bytes(self.next_bytes())
    }

    /// Read a little-endian signed 64-bit value.
    pub fn next_i64(&mut self) -> i64 {
        i64::from_le_bytes(self.next_bytes())
    }

    /// Read a little-endian 32-bit float.
    pub fn next_f32(&mut self) -> f32 {
        f32::from_le_bytes(self.next_bytes())
    }

    /// Read three consecutive little-endian 32-bit floats (x, y, z).
    ///
    /// Used throughout the catalog for actor positions; kept as a dedicated
    /// method rather than three `next_f32()` calls so decoders read the way
    /// the wire format groups the field.
    pub fn next_position3(&mut self) -> [f32; 3] {
        [self.next_f32(), self.next_f32(), self.next_f32()]
    }

    /// Read a NUL-terminated UTF-8 string, cursor landing just past the
    /// terminator.
    ///
    /// Scans at most [`STRING_SOFT_CAP`] bytes (or however many remain, if
    /// fewer). If no terminator is found within that window the reader is
    /// marked truncated and whatever was scanned is returned, lossily
    /// decoded.
    pub fn next_string(&mut self) -> String {
        let scan_limit = self.remaining().min(STRING_SOFT_CAP);
        let window = &self.data[self.pos..self.pos + scan_limit];

        match window.iter().position(|&b| b == 0) {
            Some(nul_offset) => {
                let s = String::from_utf8_lossy(&window[..nul_offset]).into_owned();
                self.pos += nul_offset + 1;
                s
            },
            None => {
                self.truncated = true;
                let s = String::from_utf8_lossy(window).into_owned();
                self.pos += scan_limit;
                s
            },
        }
    }

    /// Build a reader over a segment's already-sliced IPC body.
    #[must_use]
    pub fn for_ipc_body(body: &'a [u8]) -> Self {
        Self::new(body)
    }
}
