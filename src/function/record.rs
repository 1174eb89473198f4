//! Binary records for functions and their subfunctions.
//!
//! A function is the `FUNC` tag, an `i32` segment count, then one fixed
//! 33-byte record per segment:
//!
//! `[i32 degree][f32 x_start][f32 x_end][f32 y_start][f32 arg1][f32 sym_arg][f32 center][f32 tension][bool locked]`

use super::degree::{Degree, DegreeKind};
use super::piecewise::{FuncType, Function};
use super::subfunction::Subfunction;
use crate::persistence::{ByteReader, ByteWriter, PersistenceError};
use crate::sim::physics;

pub const FUNCTION_MAGIC: &[u8; 4] = b"FUNC";

pub const SUBFUNCTION_RECORD_LEN: usize = 33;

const DOMAIN_TOLERANCE: f32 = 16.0 * physics::EPSILON;

impl Subfunction {
    pub fn save(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.kind().as_i32());
        writer.write_f32(self.x_start);
        writer.write_f32(self.x_end);
        writer.write_f32(self.y_start);
        writer.write_f32(self.arg1());
        writer.write_f32(self.sym_arg);
        writer.write_f32(self.center);
        writer.write_f32(self.tension);
        writer.write_bool(self.locked);
    }

    fn read(reader: &mut ByteReader) -> Result<Self, PersistenceError> {
        let raw_degree = reader.read_i32()?;
        let kind = DegreeKind::from_i32(raw_degree).ok_or(PersistenceError::UnknownDegree(raw_degree))?;
        let x_start = reader.read_f32()?;
        let x_end = reader.read_f32()?;
        let y_start = reader.read_f32()?;
        let arg1 = reader.read_f32()?;
        let sym_arg = reader.read_f32()?;
        let center = reader.read_f32()?;
        let tension = reader.read_f32()?;
        let locked = reader.read_bool()?;

        Ok(Self {
            x_start,
            x_end,
            y_start,
            sym_arg,
            center,
            tension,
            degree: Degree::from_stored(kind, arg1),
            locked,
        })
    }
}

impl Function {
    pub fn save(&self, writer: &mut ByteWriter) {
        writer.write_raw(FUNCTION_MAGIC);
        writer.write_i32(self.len() as i32);
        for sub in self.segments() {
            sub.save(writer);
        }
    }

    /// Decodes a function record. Freeform segments get the default control
    /// points since those are not stored.
    pub fn read(reader: &mut ByteReader, func_type: FuncType) -> Result<Self, PersistenceError> {
        reader.expect_magic(FUNCTION_MAGIC)?;
        let count = reader.read_i32()?;
        if count < 1 {
            return Err(PersistenceError::InvalidCount(count));
        }
        let count = count as usize;
        if count > reader.remaining() / SUBFUNCTION_RECORD_LEN {
            return Err(PersistenceError::TruncatedData);
        }

        let segments = (0..count)
            .map(|_| Subfunction::read(reader))
            .collect::<Result<Vec<_>, _>>()?;
        check_domain(&segments)?;
        Ok(Self::from_segments(segments, func_type))
    }

    /// Replaces this function with the record at the reader. On error the
    /// function is left untouched.
    pub fn load(&mut self, reader: &mut ByteReader) -> Result<(), PersistenceError> {
        *self = Self::read(reader, self.func_type())?;
        Ok(())
    }

    /// Loads a record written by older versions; the layout is unchanged.
    pub fn legacy_load(&mut self, reader: &mut ByteReader) -> Result<(), PersistenceError> {
        self.load(reader)
    }
}

/// Segments must tile `[0, max]` in order without gaps, and at most one may
/// be locked.
fn check_domain(segments: &[Subfunction]) -> Result<(), PersistenceError> {
    let mut expected_start = 0.0f32;
    for (index, sub) in segments.iter().enumerate() {
        let gap = (sub.x_start - expected_start).abs();
        if !(gap <= DOMAIN_TOLERANCE * expected_start.abs().max(1.0)) || !(sub.x_start <= sub.x_end) {
            return Err(PersistenceError::InvalidDomain(index));
        }
        expected_start = sub.x_end;
    }

    if segments.iter().filter(|sub| sub.locked).count() > 1 {
        return Err(PersistenceError::MultipleLocked);
    }
    Ok(())
}
