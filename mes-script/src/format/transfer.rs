//! Text export and import.
//!
//! Interchange layout, one block per exported string:
//!
//! ```text
//! ◇AAAAAAAA◇<original>
//! ◆AAAAAAAA◆<translation>
//! <blank>
//! ```
//!
//! `AAAAAAAA` is the instruction's original address as 8 uppercase hex
//! digits. Only the `◆` line is consulted on import. Literal CR/LF inside
//! text appear as the two-character escapes `\r` / `\n`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::nls::Nls;

use super::cipher::{decrypt, encrypt};
use super::error::ScriptError;
use super::inst::OpKind;
use super::script::{ScriptImage, JUMP_ADDR_MASK, JUMP_FLAG_MASK};

fn escape(s: &str) -> String {
    s.replace('\r', "\\r").replace('\n', "\\n")
}

fn unescape(s: &str) -> String {
    s.replace("\\r", "\r").replace("\\n", "\n")
}

/// Parse the interchange text into address -> translation. Duplicate
/// addresses overwrite silently, last occurrence winning.
fn parse_interchange(text: &str) -> Result<HashMap<u32, String>, ScriptError> {
    let mut translated = HashMap::new();

    for (line_no, line) in text.lines().enumerate() {
        let Some(rest) = line.strip_prefix('◆') else {
            // Empty lines, original (`◇`) lines and separators.
            continue;
        };

        let (addr, text) = rest
            .split_once('◆')
            .ok_or(ScriptError::BadLine { line: line_no })?;
        if addr.is_empty() || text.is_empty() {
            return Err(ScriptError::BadLine { line: line_no });
        }

        let addr = u32::from_str_radix(addr, 16)
            .map_err(|_| ScriptError::BadAddress { line: line_no })?;

        translated.insert(addr, unescape(text));
    }

    Ok(translated)
}

impl ScriptImage {
    /// Write every encrypted-string payload to the interchange file at
    /// `path`, decoded as Shift-JIS. A script with no string instructions
    /// produces no file at all.
    pub fn export_text(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let strings: Vec<_> = self
            .insts
            .iter()
            .filter(|i| i.kind == OpKind::LoadEncryptedString)
            .collect();
        if strings.is_empty() {
            return Ok(());
        }

        let mut out = String::new();
        for inst in strings {
            if inst.len <= 2 {
                // Opcode + terminator only.
                continue;
            }

            let start = inst.addr as usize + 1;
            let mut bytes = self.code[start..start + inst.len as usize - 2].to_vec();
            decrypt(&mut bytes);

            let text = escape(&Nls::ShiftJIS.decode(&bytes));
            out.push_str(&format!("◇{:08X}◇{}\n", inst.addr, text));
            out.push_str(&format!("◆{:08X}◆{}\n", inst.addr, text));
            out.push('\n');
        }

        fs::write(path, out)?;
        Ok(())
    }

    /// Parse the interchange file at `path` and rebuild the code block
    /// with the translations re-encoded as `nls`. With no string
    /// instructions, or no translations, the code block is left untouched
    /// (in the former case the file is not even read).
    pub fn import_text(&mut self, path: impl AsRef<Path>, nls: Nls) -> Result<(), ScriptError> {
        if !self.insts.iter().any(|i| i.kind == OpKind::LoadEncryptedString) {
            return Ok(());
        }

        let translated = parse_interchange(&fs::read_to_string(path)?)?;
        if translated.is_empty() {
            return Ok(());
        }

        self.rebuild(&translated, nls);
        Ok(())
    }

    /// Re-emit the code block with translations substituted, then relocate
    /// the jump table.
    fn rebuild(&mut self, translated: &HashMap<u32, String>, nls: Nls) {
        // Version & type header passes through untouched.
        let mut out = Vec::with_capacity(self.code.len());
        out.extend_from_slice(&self.code[..2]);

        for inst in &mut self.insts {
            inst.new_addr = out.len() as u32;

            let addr = inst.addr as usize;
            match translated.get(&inst.addr) {
                Some(text) if inst.kind == OpKind::LoadEncryptedString => {
                    let mut bytes = nls.encode(text);
                    encrypt(&mut bytes);

                    out.push(self.code[addr]);
                    out.extend_from_slice(&bytes);
                    out.push(0);
                }
                _ => out.extend_from_slice(&self.code[addr..addr + inst.len as usize]),
            }
        }

        // Relocate against the original addresses; entries that point at
        // no instruction are left alone. The instruction list is sorted by
        // construction.
        for entry in &mut self.jump_table {
            let target = *entry & JUMP_ADDR_MASK;
            if let Ok(idx) = self.insts.binary_search_by_key(&target, |i| i.addr) {
                *entry = (*entry & JUMP_FLAG_MASK) | (self.insts[idx].new_addr & JUMP_ADDR_MASK);
            }
        }

        self.code = out;
    }
}
