//! The byte transform that obscures in-file text.
//!
//! `encrypt` is not the exact inverse of `decrypt`: it remaps an input
//! space (0x20) to 0x24 before subtracting, so a space never lands in the
//! code block as the 0x00 string terminator. The original engine's own
//! decoder shows the same asymmetry, so it is reproduced here as is.

/// Recover readable text from an in-file string payload, in place.
pub fn decrypt(bytes: &mut [u8]) {
    for b in bytes.iter_mut() {
        *b = b.wrapping_add(0x20);
    }
}

/// Obscure text for writing back into the code block, in place. Never
/// emits 0x00 for an input space.
pub fn encrypt(bytes: &mut [u8]) {
    for b in bytes.iter_mut() {
        if *b == 0x20 {
            *b = 0x24;
        }
        *b = b.wrapping_sub(0x20);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_adds_with_wraparound() {
        let mut bytes = [0x00, 0x48, 0xE0, 0xFF];
        decrypt(&mut bytes);
        assert_eq!(bytes, [0x20, 0x68, 0x00, 0x1F]);
    }

    #[test]
    fn encrypt_subtracts_with_wraparound() {
        let mut bytes = [0x00, 0x48, 0x1F];
        encrypt(&mut bytes);
        assert_eq!(bytes, [0xE0, 0x28, 0xFF]);
    }

    #[test]
    fn encrypt_never_emits_nul_for_space() {
        let mut bytes = *b"A B";
        encrypt(&mut bytes);
        assert_eq!(bytes, [0x21, 0x04, 0x22]);
        assert!(!bytes.contains(&0x00));
    }

    #[test]
    fn round_trips_except_remapped_space() {
        // Every cipher byte except 0x00 survives decrypt -> encrypt; 0x00
        // decrypts to a space, which re-encrypts to 0x04.
        let mut bytes: Vec<u8> = (0u8..=255).filter(|b| *b != 0x00).collect();
        let original = bytes.clone();
        decrypt(&mut bytes);
        encrypt(&mut bytes);
        assert_eq!(bytes, original);

        // A space decrypted out of cipher byte 0x00 re-encrypts to 0x04.
        let mut space = [0x00];
        decrypt(&mut space);
        assert_eq!(space, [0x20]);
        encrypt(&mut space);
        assert_eq!(space, [0x04]);
    }
}
