//! Strkey text encoding for account ids and secret seeds.
//!
//! Base32 (RFC 4648, no padding) over a version byte, the 32-byte key, and a
//! CRC16-XModem checksum. Account ids render with a 'G' prefix, secret seeds
//! with 'S'.

use super::keys::KeyError;

const VERSION_ACCOUNT_ID: u8 = 6 << 3; // 'G'
const VERSION_SEED: u8 = 18 << 3; // 'S'

/// Encode an account id (G...).
pub fn encode_account_id(key: &[u8; 32]) -> String {
    encode_check(VERSION_ACCOUNT_ID, key)
}

/// Decode an account id (G...).
pub fn decode_account_id(s: &str) -> Result<[u8; 32], KeyError> {
    decode_check(VERSION_ACCOUNT_ID, s)
}

/// Encode a secret seed (S...).
pub fn encode_secret_seed(seed: &[u8; 32]) -> String {
    encode_check(VERSION_SEED, seed)
}

/// Decode a secret seed (S...).
pub fn decode_secret_seed(s: &str) -> Result<[u8; 32], KeyError> {
    decode_check(VERSION_SEED, s)
}

fn encode_check(version: u8, data: &[u8; 32]) -> String {
    let mut payload = Vec::with_capacity(35);
    payload.push(version);
    payload.extend_from_slice(data);
    let checksum = crc16_xmodem(&payload);
    payload.extend_from_slice(&checksum.to_le_bytes());
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, &payload)
}

fn decode_check(expected_version: u8, s: &str) -> Result<[u8; 32], KeyError> {
    let decoded = base32::decode(base32::Alphabet::Rfc4648 { padding: false }, s)
        .ok_or_else(|| KeyError::Malformed("invalid base32".into()))?;

    // version byte + 32 key bytes + 2 checksum bytes
    if decoded.len() != 35 {
        return Err(KeyError::Malformed(format!(
            "decoded length {} != 35",
            decoded.len()
        )));
    }
    if decoded[0] != expected_version {
        return Err(KeyError::Malformed(format!(
            "version byte {:#04x} != {:#04x}",
            decoded[0], expected_version
        )));
    }

    let checksum = u16::from_le_bytes([decoded[33], decoded[34]]);
    if checksum != crc16_xmodem(&decoded[..33]) {
        return Err(KeyError::Malformed("checksum mismatch".into()));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&decoded[1..33]);
    Ok(key)
}

fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_round_trip() {
        let key = [42u8; 32];
        let encoded = encode_account_id(&key);
        assert!(encoded.starts_with('G'));
        assert_eq!(decode_account_id(&encoded).unwrap(), key);
    }

    #[test]
    fn secret_seed_round_trip() {
        let seed = [7u8; 32];
        let encoded = encode_secret_seed(&seed);
        assert!(encoded.starts_with('S'));
        assert_eq!(decode_secret_seed(&encoded).unwrap(), seed);
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let encoded = encode_account_id(&[0u8; 32]);
        let mut chars: Vec<char> = encoded.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let corrupted: String = chars.into_iter().collect();
        assert!(decode_account_id(&corrupted).is_err());
    }

    #[test]
    fn seed_does_not_decode_as_account_id() {
        let encoded = encode_secret_seed(&[9u8; 32]);
        assert!(decode_account_id(&encoded).is_err());
    }
}
