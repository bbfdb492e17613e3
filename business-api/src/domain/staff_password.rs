use base64::prelude::*;
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// A salted SHA-256 password hash stored as `salt:digest` (both base64).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffPassword(String);

impl StaffPassword {
    pub fn hash(plain: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let digest = digest(&salt, plain);
        let salt_b64 = BASE64_STANDARD.encode(salt);
        let digest_b64 = BASE64_STANDARD.encode(digest);
        Self(format!("{salt_b64}:{digest_b64}"))
    }

    #[cfg(test)]
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    #[cfg(test)]
    pub fn verify(&self, plain: &str) -> bool {
        let Some((salt_b64, digest_b64)) = self.0.split_once(':') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (
            BASE64_STANDARD.decode(salt_b64),
            BASE64_STANDARD.decode(digest_b64),
        ) else {
            return false;
        };

        digest(&salt, plain).as_slice() == expected.as_slice()
    }
}

impl AsRef<str> for StaffPassword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn digest(salt: &[u8], plain: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plain.as_bytes());
    hasher.finalize().to_vec()
}
