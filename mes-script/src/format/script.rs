//! The script container: jump table + code block.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::error::ScriptError;
use super::inst::{decode_insts, Inst};

/// Bytes consumed for the code block on load, regardless of how much of
/// it is semantically meaningful. A rebuilt block may have a different
/// length on save; the container carries no explicit length for it.
pub const CODE_BLOCK_LEN: usize = 0x30D40;

/// Low 31 bits of a jump entry: an address into the code block.
pub const JUMP_ADDR_MASK: u32 = 0x7FFF_FFFF;

/// Bit 31 of a jump entry: a flag preserved verbatim across relocation.
pub const JUMP_FLAG_MASK: u32 = 0x8000_0000;

/// One `.mes` script: jump table, code block, and the decoded instruction
/// spans. Created per file, loaded once, optionally rebuilt once, saved.
#[derive(Debug, Clone)]
pub struct ScriptImage {
    pub(crate) jump_table: Vec<u32>,
    pub(crate) code: Vec<u8>,
    pub(crate) insts: Vec<Inst>,
}

impl ScriptImage {
    /// Read a script file: signed 32-bit jump count, that many 32-bit
    /// entries, then exactly [`CODE_BLOCK_LEN`] code bytes. Decoding
    /// failures reject the file as a whole.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let mut rdr = BufReader::new(File::open(path)?);

        let count = rdr.read_i32::<LittleEndian>()?;
        if count < 0 {
            return Err(ScriptError::NegativeJumpCount { count });
        }

        let mut jump_table = Vec::with_capacity(count as usize);
        for _ in 0..count {
            jump_table.push(rdr.read_u32::<LittleEndian>()?);
        }

        let mut code = vec![0u8; CODE_BLOCK_LEN];
        rdr.read_exact(&mut code)?;

        Self::from_parts(jump_table, code)
    }

    /// Assemble an image from an already-read jump table and code block.
    pub fn from_parts(jump_table: Vec<u32>, code: Vec<u8>) -> Result<Self, ScriptError> {
        let insts = decode_insts(&code)?;
        Ok(Self { jump_table, code, insts })
    }

    /// Write the container back out: count, entries, then the current code
    /// block verbatim. No padding, no checksum, no length prefix.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let mut wtr = BufWriter::new(File::create(path)?);

        wtr.write_i32::<LittleEndian>(self.jump_table.len() as i32)?;
        for &entry in &self.jump_table {
            wtr.write_u32::<LittleEndian>(entry)?;
        }
        wtr.write_all(&self.code)?;
        wtr.flush()?;

        Ok(())
    }

    #[inline]
    pub fn jump_table(&self) -> &[u32] {
        &self.jump_table
    }

    #[inline]
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    #[inline]
    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }
}
