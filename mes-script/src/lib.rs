//! mes-script
//!
//! Container parsing and text transfer for the old CIRCUS engine's `.mes`
//! script files: discover instruction boundaries in the bytecode stream,
//! pull out the cipher-obscured strings for translation, and rebuild a
//! script the original interpreter still accepts.

pub mod format;
pub mod nls;
