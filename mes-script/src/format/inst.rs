//! Instruction-boundary discovery.
//!
//! The decoder walks the code block and partitions it into contiguous
//! spans using the opcode range table below. Nothing about operand
//! semantics is decoded; only how many bytes each instruction occupies
//! and whether its payload is an encrypted string.

use super::error::ScriptError;

/// Classification of a decoded instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpKind {
    #[default]
    Unknown,
    LoadEncryptedString,
}

/// What an opcode consumes after the opcode byte itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpShape {
    /// Two fixed operand bytes.
    Fixed2,
    /// One fixed byte, then a NUL-terminated string.
    PrefixedString,
    /// A NUL-terminated string.
    BareString,
    /// A NUL-terminated, cipher-obscured string.
    EncryptedString,
    /// Four 2-byte fields.
    Fixed8,
}

/// The opcode range table: closed, non-overlapping ranges covering every
/// byte value.
pub fn op_shape(op: u8) -> OpShape {
    match op {
        0x00..=0x28 => OpShape::Fixed2,
        0x29..=0x2E => OpShape::PrefixedString,
        0x2F..=0x4B => OpShape::BareString,
        0x4C..=0x4F => OpShape::EncryptedString,
        0x50..=0xFF => OpShape::Fixed8,
    }
}

/// One contiguous instruction span in the code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    /// Offset of the opcode byte, relative to the start of the code block.
    pub addr: u32,
    /// Total bytes consumed, opcode included.
    pub len: u32,
    /// Offset assigned by the rebuild pass; zero until then.
    pub new_addr: u32,
    pub kind: OpKind,
}

struct Cursor<'a> {
    code: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn read_u8(&mut self) -> Result<u8, ScriptError> {
        let b = self
            .code
            .get(self.pos)
            .copied()
            .ok_or(ScriptError::Truncated { offset: self.pos, len: self.code.len() })?;
        self.pos += 1;
        Ok(b)
    }

    /// Skip `n` fixed operand bytes.
    fn skip(&mut self, n: usize) -> Result<(), ScriptError> {
        if self.pos + n > self.code.len() {
            return Err(ScriptError::Truncated { offset: self.pos + n, len: self.code.len() });
        }
        self.pos += n;
        Ok(())
    }

    /// Skip a NUL-terminated string, terminator included.
    fn skip_cstring(&mut self) -> Result<(), ScriptError> {
        while self.read_u8()? != 0 {}
        Ok(())
    }
}

/// Partition `code[2..]` into contiguous instruction spans.
///
/// The first two bytes are the version and type header; decoding starts at
/// offset 2 and must consume the block exactly. Any gap, overlap or
/// overrun rejects the whole file.
pub fn decode_insts(code: &[u8]) -> Result<Vec<Inst>, ScriptError> {
    let mut cur = Cursor { code, pos: 0 };

    let version = cur.read_u8()?;
    let ty = cur.read_u8()?;
    log::debug!("version: {}, type: {}", version, ty);

    let mut insts = Vec::new();

    while cur.pos < code.len() {
        let addr = cur.pos;
        let op = cur.read_u8()?;

        let kind = match op_shape(op) {
            OpShape::Fixed2 => {
                cur.skip(2)?;
                OpKind::Unknown
            }
            OpShape::PrefixedString => {
                cur.skip(1)?;
                cur.skip_cstring()?;
                OpKind::Unknown
            }
            OpShape::BareString => {
                cur.skip_cstring()?;
                OpKind::Unknown
            }
            OpShape::EncryptedString => {
                cur.skip_cstring()?;
                OpKind::LoadEncryptedString
            }
            OpShape::Fixed8 => {
                cur.skip(8)?;
                OpKind::Unknown
            }
        };

        insts.push(Inst {
            addr: addr as u32,
            len: (cur.pos - addr) as u32,
            new_addr: 0,
            kind,
        });
    }

    let decoded: usize = insts.iter().map(|i| i.len as usize).sum();
    let expected = code.len() - 2;
    if decoded != expected {
        return Err(ScriptError::Tiling { decoded, expected });
    }

    Ok(insts)
}
