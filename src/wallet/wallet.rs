use crate::error::{LedgerError, Result};
use crate::utils::{
    base58_decode, base58_encode, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify,
    new_key_pair,
};
use data_encoding::HEXLOWER;
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};

/// An ECDSA P-256 key pair
///
/// The public address is the Base58 encoding of the raw public key, so a
/// verifier can recover the key from the address alone.
#[derive(Clone)]
pub struct Wallet {
    pkcs8: Vec<u8>,
    public_key: Vec<u8>,
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let pkcs8 = new_key_pair()?;
        Self::from_pkcs8(&pkcs8)
    }

    pub fn from_pkcs8(pkcs8: &[u8]) -> Result<Wallet> {
        let rng = SystemRandom::new();
        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
            .map_err(|e| {
                LedgerError::Crypto(format!("Failed to create key pair from PKCS8: {e}"))
            })?;
        let public_key = key_pair.public_key().as_ref().to_vec();
        Ok(Wallet {
            pkcs8: pkcs8.to_vec(),
            public_key,
        })
    }

    pub fn address(&self) -> String {
        base58_encode(self.public_key.as_slice())
    }

    /// Private key material as hex, for hand-off to a later invocation
    pub fn export_key(&self) -> String {
        HEXLOWER.encode(self.pkcs8.as_slice())
    }

    pub fn get_pkcs8(&self) -> &[u8] {
        self.pkcs8.as_slice()
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        ecdsa_p256_sha256_sign_digest(self.pkcs8.as_slice(), message)
    }
}

/// Verify a signature against the public address it claims to come from.
/// Any failure (bad address encoding included) is a plain `false`.
pub fn verify_signature(address: &str, message: &[u8], signature: &[u8]) -> bool {
    let public_key = match base58_decode(address) {
        Ok(key) => key,
        Err(_) => return false,
    };
    ecdsa_p256_sha256_sign_verify(public_key.as_slice(), signature, message)
}

/// Check that a private key reproduces the claimed public address
pub fn validate_key_pair(pkcs8: &[u8], address: &str) -> bool {
    match Wallet::from_pkcs8(pkcs8) {
        Ok(wallet) => wallet.address() == address,
        Err(_) => false,
    }
}
