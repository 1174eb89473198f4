//! Byte-reversed primitive reader/writer.
//!
//! Every multi-byte primitive is copied one byte at a time in reverse memory
//! order, which on little-endian hosts is big-endian on disk.

use super::PersistenceError;

pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_data(&self) -> bool {
        self.position < self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    fn take(&mut self, length: usize) -> Result<&'a [u8], PersistenceError> {
        if self.remaining() < length {
            return Err(PersistenceError::TruncatedData);
        }
        let bytes = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(bytes)
    }

    /// Reads `N` bytes, reversing their order.
    pub fn read_reversed<const N: usize>(&mut self) -> Result<[u8; N], PersistenceError> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        for (i, byte) in bytes.iter().enumerate() {
            out[N - 1 - i] = *byte;
        }
        Ok(out)
    }

    pub fn read_byte(&mut self) -> Result<u8, PersistenceError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, PersistenceError> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_i32(&mut self) -> Result<i32, PersistenceError> {
        Ok(i32::from_le_bytes(self.read_reversed::<4>()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, PersistenceError> {
        Ok(f32::from_le_bytes(self.read_reversed::<4>()?))
    }

    /// Fixed-length raw string, no terminator.
    pub fn read_string(&mut self, length: usize) -> Result<String, PersistenceError> {
        let bytes = self.take(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PersistenceError::InvalidName)
    }

    /// Consumes `magic.len()` bytes and checks them against `magic`.
    pub fn expect_magic(&mut self, magic: &[u8]) -> Result<(), PersistenceError> {
        let found = self.take(magic.len())?;
        if found != magic {
            return Err(PersistenceError::InvalidMagic {
                expected: String::from_utf8_lossy(magic).into_owned(),
                found: String::from_utf8_lossy(found).into_owned(),
            });
        }
        Ok(())
    }
}

pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(256),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes `data` last byte first.
    pub fn write_reversed(&mut self, data: &[u8]) {
        self.buffer.extend(data.iter().rev());
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(if value { 1 } else { 0 });
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_reversed(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_reversed(&value.to_le_bytes());
    }

    /// Raw bytes in memory order, for magic tags and fixed-length strings.
    pub fn write_raw(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}
