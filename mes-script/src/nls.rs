//! Text encoding selection for script strings.

use std::str::FromStr;

use anyhow::anyhow;
use encoding_rs::{Encoding, GB18030, SHIFT_JIS, UTF_8};

/// National language support: which encoding the in-file strings use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Nls {
    #[default]
    ShiftJIS,
    /// Treated as GB18030 (superset). This is robust for legacy CN assets.
    GBK,
    UTF8,
}

impl FromStr for Nls {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sjis" | "shift_jis" | "shift-jis" => Ok(Nls::ShiftJIS),
            "gbk" | "gb18030" => Ok(Nls::GBK),
            "utf8" | "utf-8" => Ok(Nls::UTF8),
            _ => Err(anyhow!("unknown NLS: {}", s)),
        }
    }
}

impl Nls {
    #[inline]
    fn as_encoding_rs(self) -> &'static Encoding {
        match self {
            Nls::ShiftJIS => SHIFT_JIS,
            Nls::GBK => GB18030,
            Nls::UTF8 => UTF_8,
        }
    }

    /// Decode raw script bytes to a UTF-8 string. Malformed sequences are
    /// replaced and logged.
    pub fn decode(self, bytes: &[u8]) -> String {
        let (s, _, had_errors) = self.as_encoding_rs().decode(bytes);
        if had_errors {
            log::warn!("failed to cleanly decode {} bytes as {:?}", bytes.len(), self);
        }
        s.into_owned()
    }

    /// Encode a UTF-8 string back to script bytes. Best effort:
    /// unrepresentable characters are replaced.
    pub fn encode(self, s: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = self.as_encoding_rs().encode(s);
        if had_errors {
            log::warn!("failed to cleanly encode string as {:?}", self);
        }
        bytes.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_labels() {
        assert_eq!("sjis".parse::<Nls>().unwrap(), Nls::ShiftJIS);
        assert_eq!("shift_jis".parse::<Nls>().unwrap(), Nls::ShiftJIS);
        assert_eq!("GBK".parse::<Nls>().unwrap(), Nls::GBK);
        assert_eq!("utf-8".parse::<Nls>().unwrap(), Nls::UTF8);
        assert!("latin1".parse::<Nls>().is_err());
    }

    #[test]
    fn ascii_round_trips_through_shift_jis() {
        let s = "ABCxyz123";
        let bytes = Nls::ShiftJIS.encode(s);
        assert_eq!(Nls::ShiftJIS.decode(&bytes), s);
    }

    #[test]
    fn japanese_round_trips_through_shift_jis() {
        let s = "こんにちは";
        let bytes = Nls::ShiftJIS.encode(s);
        assert_eq!(bytes.len(), 10);
        assert_eq!(Nls::ShiftJIS.decode(&bytes), s);
    }
}
