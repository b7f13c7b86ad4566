//! The `.mes` container: a jump table followed by a fixed-size code block.
//!
//! Only instruction byte-lengths and string-bearing classification are
//! modeled. Operands of non-string instructions are opaque and are copied
//! through untouched by the rebuild pass.

mod cipher;
mod error;
mod inst;
mod script;
mod transfer;

pub use cipher::{decrypt, encrypt};
pub use error::ScriptError;
pub use inst::{decode_insts, op_shape, Inst, OpKind, OpShape};
pub use script::{ScriptImage, CODE_BLOCK_LEN, JUMP_ADDR_MASK, JUMP_FLAG_MASK};
