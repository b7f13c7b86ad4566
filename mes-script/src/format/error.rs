/// Failure modes of `.mes` parsing and text transfer.
///
/// Every variant is terminal for the file being processed; nothing is
/// written for a file that fails, and the batch driver moves on to the
/// next one.
#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("instruction stream does not tile the code block: decoded 0x{decoded:X} bytes, expected 0x{expected:X}")]
    Tiling { decoded: usize, expected: usize },

    #[error("instruction read past the end of the code block: offset=0x{offset:X}, len=0x{len:X}")]
    Truncated { offset: usize, len: usize },

    #[error("negative jump table count: {count}")]
    NegativeJumpCount { count: i32 },

    #[error("bad translation line {line}: expected `◆<hex-addr>◆<text>`")]
    BadLine { line: usize },

    #[error("bad address in translation line {line}")]
    BadAddress { line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
