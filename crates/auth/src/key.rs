//! Symmetric key material: the root of trust for every token operation.

use zeroize::Zeroize;

use crate::error::{AuthError, AuthResult};

/// Length of the symmetric key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// A 256-bit symmetric key, loaded once at startup and never mutated.
///
/// Not `Clone`: share it behind an `Arc`. The bytes are wiped on drop and never
/// appear in `Debug` output.
pub struct KeyMaterial([u8; KEY_LEN]);

impl KeyMaterial {
    /// Decode a key from its 64-character hexadecimal form.
    pub fn from_hex(raw: &str) -> AuthResult<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != KEY_LEN * 2 {
            return Err(AuthError::configuration(format!(
                "token key must be {} hex characters, got {}",
                KEY_LEN * 2,
                trimmed.len()
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(trimmed, &mut bytes)
            .map_err(|e| AuthError::configuration(format!("token key is not valid hex: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl core::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn decodes_64_hex_characters() {
        let key = KeyMaterial::from_hex(HEX_KEY).unwrap();
        assert_eq!(key.as_bytes()[0], 0x00);
        assert_eq!(key.as_bytes()[31], 0x1f);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert!(KeyMaterial::from_hex(&format!("  {HEX_KEY}\n")).is_ok());
    }

    #[test]
    fn rejects_short_key() {
        let err = KeyMaterial::from_hex(&HEX_KEY[..62]).unwrap_err();
        assert!(matches!(err, AuthError::ConfigurationInvalid(_)));
    }

    #[test]
    fn rejects_non_hex() {
        let bad = format!("zz{}", &HEX_KEY[2..]);
        assert!(matches!(
            KeyMaterial::from_hex(&bad),
            Err(AuthError::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn rejects_empty_key() {
        assert!(KeyMaterial::from_hex("").is_err());
    }

    #[test]
    fn debug_is_redacted() {
        let key = KeyMaterial::from_hex(HEX_KEY).unwrap();
        assert_eq!(format!("{key:?}"), "KeyMaterial(<redacted>)");
    }
}
