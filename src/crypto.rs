//! Cryptographic primitives for minichain

use crate::error::{ChainError, Result};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use ripemd::Ripemd160;
use secp256k1::{
    constants::{SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};
use tracing::debug;

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// SHA-256 digest of a signing message; the ECDSA input.
pub type MessageHash = [u8; 32];

/// `x ‖ y`, 64 hex characters each.
pub const PUBLIC_KEY_HEX_LEN: usize = 128;

/// 20-byte RIPEMD-160 digest rendered as hex.
pub const ADDRESS_HEX_LEN: usize = 40;

/// Tag byte of the SEC1 uncompressed point encoding.
const UNCOMPRESSED_TAG: u8 = 0x04;

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    /// Creates a KeyPair from an existing SecretKey.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Rebuilds a KeyPair from the 64-character hex form of its secret scalar.
    pub fn from_private_hex(private_key_hex: &str) -> Result<Self> {
        let bytes = hex::decode(private_key_hex)
            .map_err(|e| ChainError::MalformedInput(format!("Invalid private key hex: {}", e)))?;
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(ChainError::MalformedInput(format!(
                "Private key must be {} bytes, got {}",
                SECRET_KEY_SIZE,
                bytes.len()
            )));
        }
        let secret_key = SecretKey::from_slice(&bytes)
            .map_err(|e| ChainError::MalformedInput(format!("Invalid private key: {}", e)))?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// The secret scalar as 64 hex characters.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Zero-padded big-endian `x ‖ y`, without the SEC1 tag byte.
    pub fn public_key_hex(&self) -> String {
        let serialized: [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] =
            self.public_key.serialize_uncompressed();
        hex::encode(&serialized[1..])
    }

    /// Display address of this KeyPair's public key.
    pub fn address(&self) -> String {
        address_from_bytes(&self.public_key.serialize_uncompressed()[1..])
    }

    /// Hashes `message` with SHA-256 and signs the digest (RFC 6979 nonce).
    /// Returns the digest together with the DER signature as hex.
    pub fn sign(&self, message: &[u8]) -> (MessageHash, String) {
        let digest = hash_message(message);
        let msg = Message::from_digest(digest);
        let signature = SECP256K1_CONTEXT.sign_ecdsa(&msg, &self.secret_key);
        (digest, hex::encode(&signature.serialize_der()[..]))
    }
}

/// Returns `(private_key_hex, public_key_hex)` for a fresh wallet.
pub fn generate_keypair() -> (String, String) {
    let keypair = KeyPair::generate();
    (keypair.private_key_hex(), keypair.public_key_hex())
}

/// SHA-256 of `message`.
pub fn hash_message(message: &[u8]) -> MessageHash {
    Sha256::digest(message).into()
}

/// [`KeyPair::sign`] for a hex-encoded private key.
pub fn sign(private_key_hex: &str, message: &[u8]) -> Result<(MessageHash, String)> {
    let keypair = KeyPair::from_private_hex(private_key_hex)?;
    Ok(keypair.sign(message))
}

/// Parses the 128-character `x ‖ y` encoding. Rejects points off the curve.
pub fn parse_public_key(public_key_hex: &str) -> Result<PublicKey> {
    if public_key_hex.len() != PUBLIC_KEY_HEX_LEN {
        return Err(ChainError::MalformedInput(format!(
            "Public key must be {} hex characters, got {}",
            PUBLIC_KEY_HEX_LEN,
            public_key_hex.len()
        )));
    }
    let coordinates = hex::decode(public_key_hex)
        .map_err(|e| ChainError::MalformedInput(format!("Invalid public key hex: {}", e)))?;

    let mut sec1 = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
    sec1[0] = UNCOMPRESSED_TAG;
    sec1[1..].copy_from_slice(&coordinates);

    PublicKey::from_slice(&sec1)
        .map_err(|e| ChainError::MalformedInput(format!("Invalid public key point: {}", e)))
}

/// Checks a DER/hex signature over `message_hash`.
///
/// `MalformedInput` covers everything that fails to decode;
/// `InvalidSignature` is a well-formed signature that does not verify.
pub fn verify_signature(
    public_key_hex: &str,
    message_hash: &[u8],
    signature_hex: &str,
) -> Result<()> {
    let public_key = parse_public_key(public_key_hex)?;

    let message = Message::from_digest_slice(message_hash)
        .map_err(|e| ChainError::MalformedInput(format!("Invalid message hash: {}", e)))?;

    let signature_bytes = hex::decode(signature_hex)
        .map_err(|e| ChainError::MalformedInput(format!("Invalid signature hex: {}", e)))?;
    let mut signature = Signature::from_der(&signature_bytes)
        .map_err(|e| ChainError::MalformedInput(format!("Invalid DER signature: {}", e)))?;
    // libsecp256k1 only accepts low-S; other signers may emit either form.
    signature.normalize_s();

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| ChainError::InvalidSignature)
}

/// Boolean form of [`verify_signature`]. Never panics.
pub fn verify(public_key_hex: &str, message_hash: &[u8], signature_hex: &str) -> bool {
    match verify_signature(public_key_hex, message_hash, signature_hex) {
        Ok(()) => true,
        Err(e) => {
            debug!("Signature failed: {}", e);
            false
        }
    }
}

/// `ripemd160(sha256(x ‖ y))` as 40 hex characters.
pub fn address_from_pubkey(public_key_hex: &str) -> Result<String> {
    let bytes = hex::decode(public_key_hex)
        .map_err(|e| ChainError::MalformedInput(format!("Invalid public key hex: {}", e)))?;
    Ok(address_from_bytes(&bytes))
}

fn address_from_bytes(public_key_bytes: &[u8]) -> String {
    let sha = Sha256::digest(public_key_bytes);
    hex::encode(Ripemd160::digest(sha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let (private_hex, public_hex) = generate_keypair();
        assert_eq!(private_hex.len(), SECRET_KEY_SIZE * 2);
        assert_eq!(public_hex.len(), PUBLIC_KEY_HEX_LEN);
        assert!(public_hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_private_hex_roundtrip() {
        let keypair = KeyPair::generate();
        let restored = KeyPair::from_private_hex(&keypair.private_key_hex()).unwrap();
        assert_eq!(keypair.public_key_hex(), restored.public_key_hex());
    }

    #[test]
    fn test_public_key_hex_parses_back() {
        let keypair = KeyPair::generate();
        let parsed = parse_public_key(&keypair.public_key_hex()).unwrap();
        assert_eq!(parsed, keypair.public_key);
    }

    #[test]
    fn test_signing_and_verification() {
        let (private_hex, public_hex) = generate_keypair();
        let (digest, signature) = sign(&private_hex, b"Hello, minichain!").unwrap();

        assert_eq!(digest, hash_message(b"Hello, minichain!"));
        assert!(verify_signature(&public_hex, &digest, &signature).is_ok());
        assert!(verify(&public_hex, &digest, &signature));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let keypair = KeyPair::generate();
        let (_, first) = keypair.sign(b"same message");
        let (_, second) = keypair.sign(b"same message");
        assert_eq!(first, second);

        let (_, other) = keypair.sign(b"other message");
        assert_ne!(first, other);
    }

    #[test]
    fn test_signature_from_other_key_is_invalid() {
        let signer = KeyPair::generate();
        let other = KeyPair::generate();
        let (digest, signature) = signer.sign(b"Test message");

        let result = verify_signature(&other.public_key_hex(), &digest, &signature);
        assert!(matches!(result, Err(ChainError::InvalidSignature)));
        assert!(!verify(&other.public_key_hex(), &digest, &signature));
    }

    #[test]
    fn test_tampered_digest_is_invalid() {
        let keypair = KeyPair::generate();
        let (_, signature) = keypair.sign(b"Original message");
        let tampered = hash_message(b"Tampered message");

        let result = verify_signature(&keypair.public_key_hex(), &tampered, &signature);
        assert!(matches!(result, Err(ChainError::InvalidSignature)));
    }

    #[test]
    fn test_high_s_signature_is_accepted() {
        let keypair = KeyPair::generate();
        let digest = hash_message(b"malleable");
        let msg = Message::from_digest(digest);
        let low = SECP256K1_CONTEXT.sign_ecdsa(&msg, &keypair.secret_key);

        // Negate s by hand: s' = n - s.
        let mut compact = low.serialize_compact();
        let order = secp256k1::constants::CURVE_ORDER;
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let diff = order[i] as i16 - compact[32 + i] as i16 - borrow;
            compact[32 + i] = diff.rem_euclid(256) as u8;
            borrow = if diff < 0 { 1 } else { 0 };
        }
        let high = Signature::from_compact(&compact).unwrap();
        assert_ne!(high, low);

        let high_hex = hex::encode(&high.serialize_der()[..]);
        assert!(verify(&keypair.public_key_hex(), &digest, &high_hex));
    }

    #[test]
    fn test_malformed_inputs_are_distinguished() {
        let keypair = KeyPair::generate();
        let (digest, signature) = keypair.sign(b"Test");
        let public_hex = keypair.public_key_hex();

        // Wrong length
        let result = verify_signature(&public_hex[2..], &digest, &signature);
        assert!(result.unwrap_err().is_malformed());

        // Not hex
        let bad_hex = "zz".repeat(PUBLIC_KEY_HEX_LEN / 2);
        assert!(verify_signature(&bad_hex, &digest, &signature)
            .unwrap_err()
            .is_malformed());

        // Point off the curve: x = 0, y = 1
        let off_curve = format!("{:0>64}{:0>64}", "0", "1");
        assert!(verify_signature(&off_curve, &digest, &signature)
            .unwrap_err()
            .is_malformed());

        // Signature is not DER
        assert!(verify_signature(&public_hex, &digest, "deadbeef")
            .unwrap_err()
            .is_malformed());

        // Signature is not hex
        assert!(verify_signature(&public_hex, &digest, "not-hex")
            .unwrap_err()
            .is_malformed());

        // Digest of the wrong width
        assert!(verify_signature(&public_hex, &digest[..16], &signature)
            .unwrap_err()
            .is_malformed());

        assert!(!verify(&off_curve, &digest, &signature));
    }

    #[test]
    fn test_from_private_hex_invalid() {
        let short = "11".repeat(SECRET_KEY_SIZE - 1);
        let err = KeyPair::from_private_hex(&short).unwrap_err();
        assert!(err.to_string().contains("Private key must be"));

        // Zero is not a valid scalar.
        let zero = "00".repeat(SECRET_KEY_SIZE);
        assert!(KeyPair::from_private_hex(&zero).unwrap_err().is_malformed());

        assert!(sign("xyz", b"msg").unwrap_err().is_malformed());
    }

    #[test]
    fn test_address_generation() {
        let keypair = KeyPair::generate();
        let address = address_from_pubkey(&keypair.public_key_hex()).unwrap();
        assert_eq!(address.len(), ADDRESS_HEX_LEN);
        assert_eq!(address, keypair.address());
    }

    #[test]
    fn test_address_known_vector() {
        // Generator point G of secp256k1.
        let g = concat!(
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
        assert_eq!(
            address_from_pubkey(g).unwrap(),
            "c862aeeb8429dc25a798ba51a422b43d7e712606"
        );
        assert!(address_from_pubkey("0x12").unwrap_err().is_malformed());
    }
}
