//! Session token generation
//!
//! Tokens are random bearer secrets. Stores only ever see their digest.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::session::SessionToken;

/// Generator for session tokens
#[derive(Debug, Clone)]
pub struct SessionTokenGenerator {
    /// Number of random bytes per token
    token_bytes: usize,
}

impl SessionTokenGenerator {
    pub fn new() -> Self {
        Self { token_bytes: 32 }
    }

    pub fn with_token_bytes(mut self, bytes: usize) -> Self {
        self.token_bytes = bytes;
        self
    }

    /// Generate a fresh token
    pub fn generate(&self) -> SessionToken {
        let mut random_bytes = vec![0u8; self.token_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        SessionToken::new(URL_SAFE_NO_PAD.encode(&random_bytes))
    }

    /// Digest under which a token is stored
    pub fn digest(token: &SessionToken) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_str().as_bytes());
        format!("sha256${}", URL_SAFE_NO_PAD.encode(hasher.finalize()))
    }
}

impl Default for SessionTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
