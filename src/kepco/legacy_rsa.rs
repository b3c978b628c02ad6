//! Credential encryption compatible with the portal's browser-side RSA code.
//!
//! The login form encrypts the account id and password with a JSBN-style
//! `RSAKey`: PKCS#1 v1.5 type-2 padding, a raw modular exponentiation and a
//! lowercase hex rendering padded to an even number of digits. This exists only
//! to interoperate with that login form.

use crate::error::EncryptionError;
use num_bigint::BigUint;
use rand::Rng;

// PKCS#1 v1.5: 0x00 0x02, at least eight padding bytes, 0x00 separator.
const PKCS1_OVERHEAD: usize = 11;

/// RSA public key built from the hex modulus and exponent the portal hands out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRsaKey {
    modulus: BigUint,
    exponent: BigUint,
}

impl LegacyRsaKey {
    /// Parses the modulus (the `cookieRsa` cookie) and exponent (the
    /// `RSAExponent` field), both hex.
    pub fn from_hex(modulus: &str, exponent: &str) -> Result<Self, EncryptionError> {
        let modulus = parse_hex(modulus)
            .filter(|n| n.bits() > 1)
            .ok_or_else(|| EncryptionError::InvalidModulus(modulus.to_string()))?;
        let exponent = parse_hex(exponent)
            .filter(|e| e.bits() > 0)
            .ok_or_else(|| EncryptionError::InvalidExponent(exponent.to_string()))?;

        Ok(Self { modulus, exponent })
    }

    /// Size of one encrypted block in bytes.
    pub fn block_len(&self) -> usize {
        ((self.modulus.bits() + 7) / 8) as usize
    }

    /// Encrypts `text`, drawing the padding bytes from `rng`.
    ///
    /// The same key, text and padding source always give the same output.
    pub fn encrypt<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> Result<String, EncryptionError> {
        let padded = pkcs1_pad(text.as_bytes(), self.block_len(), rng)?;
        let message = BigUint::from_bytes_be(&padded);
        let cipher = message.modpow(&self.exponent, &self.modulus);

        let hex = cipher.to_str_radix(16);
        if hex.len() % 2 == 0 {
            Ok(hex)
        } else {
            Ok(format!("0{}", hex))
        }
    }

    /// Encrypts `text` and prefixes it with `<session_id>_`, the token format
    /// the login endpoint expects.
    pub fn login_token<R: Rng + ?Sized>(
        &self,
        session_id: &str,
        text: &str,
        rng: &mut R,
    ) -> Result<String, EncryptionError> {
        Ok(format!("{}_{}", session_id, self.encrypt(text, rng)?))
    }
}

fn parse_hex(value: &str) -> Option<BigUint> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    BigUint::parse_bytes(value.as_bytes(), 16)
}

/// `0x00 0x02 <non-zero random bytes> 0x00 <message>`, `block_len` bytes long.
fn pkcs1_pad<R: Rng + ?Sized>(
    message: &[u8],
    block_len: usize,
    rng: &mut R,
) -> Result<Vec<u8>, EncryptionError> {
    if block_len < message.len() + PKCS1_OVERHEAD {
        return Err(EncryptionError::MessageTooLong {
            len: message.len(),
            max: block_len.saturating_sub(PKCS1_OVERHEAD),
        });
    }

    let padding_len = block_len - message.len() - 3;
    let mut block = Vec::with_capacity(block_len);
    block.push(0x00);
    block.push(0x02);
    block.extend((0..padding_len).map(|_| rng.gen_range(1..=u8::MAX)));
    block.push(0x00);
    block.extend_from_slice(message);

    Ok(block)
}
