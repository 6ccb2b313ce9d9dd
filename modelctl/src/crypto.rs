use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose};
use rand::RngExt;
use std::env;

/// Alphabet for generated ids: lowercase, uppercase, digits.
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated resource ids.
const ID_LEN: usize = 16;

/// Generates a short opaque resource id from a 62-character alphabet.
///
/// 16 characters over 62 symbols gives ~95 bits of entropy, which is plenty
/// to make collisions on a single table a non-concern.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ID_ALPHABET.len());
            ID_ALPHABET[idx] as char
        })
        .collect()
}

/// Generates a cryptographically secure API key token bound to the key id.
///
/// The token is formatted as `ak-{id}-{base64url_encoded_random_bytes}` where
/// the random bytes are 32 bytes (256 bits) of cryptographically secure random
/// data. The embedded id makes tokens traceable back to their key record, but
/// the token can never be reconstructed from the id alone.
///
/// # Examples
///
/// ```
/// use modelctl::crypto::generate_api_key_token;
///
/// let token = generate_api_key_token("abc123");
/// assert!(token.starts_with("ak-abc123-"));
/// ```
pub fn generate_api_key_token(id: &str) -> String {
    // 32 bytes (256 bits) of cryptographically secure random data
    let mut token_bytes = [0u8; 32];
    rand::rng().fill(&mut token_bytes);

    format!("ak-{}-{}", id, general_purpose::URL_SAFE_NO_PAD.encode(token_bytes))
}

/// Masks a secret for display: first 5 characters, `****`, last 4 characters.
///
/// Secrets too short to mask meaningfully are replaced entirely with `****`.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 9 {
        return "****".to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

fn load_encryption_key() -> Result<Vec<u8>, anyhow::Error> {
    let key_b64 =
        env::var("ENCRYPTION_KEY").map_err(|_| anyhow::anyhow!("ENCRYPTION_KEY environment variable not set"))?;

    let key_bytes = general_purpose::STANDARD
        .decode(key_b64)
        .map_err(|e| anyhow::anyhow!("Failed to decode ENCRYPTION_KEY: {}", e))?;

    if key_bytes.len() != 32 {
        return Err(anyhow::anyhow!(
            "ENCRYPTION_KEY must be 32 bytes (256 bits), got {} bytes",
            key_bytes.len()
        ));
    }

    Ok(key_bytes)
}

/// Encrypts data using AES-256-GCM with a key from the ENCRYPTION_KEY environment variable.
///
/// The encryption key must be provided via the ENCRYPTION_KEY environment variable
/// and should be 32 bytes (256 bits) when decoded from base64.
///
/// # Returns
///
/// The encrypted data as a base64-encoded string (nonce + ciphertext).
///
/// # Errors
///
/// Returns an error if:
/// - ENCRYPTION_KEY environment variable is not set
/// - The encryption key is not valid base64 or not 32 bytes
/// - Encryption fails
pub fn encrypt_with_env_key(plaintext: &[u8]) -> Result<String, anyhow::Error> {
    let key_bytes = load_encryption_key()?;
    encrypt_with_key(&key_bytes, plaintext)
}

/// Decrypts data that was encrypted with [`encrypt_with_env_key`].
///
/// # Errors
///
/// Returns an error if:
/// - ENCRYPTION_KEY environment variable is not set
/// - The encryption key is not valid base64 or not 32 bytes
/// - The encrypted data is not valid base64 or too short
/// - Decryption fails
pub fn decrypt_with_env_key(encrypted_b64: &str) -> Result<Vec<u8>, anyhow::Error> {
    let key_bytes = load_encryption_key()?;
    decrypt_with_key(&key_bytes, encrypted_b64)
}

/// Encrypts data using AES-256-GCM with an explicit 32-byte key.
pub fn encrypt_with_key(key_bytes: &[u8], plaintext: &[u8]) -> Result<String, anyhow::Error> {
    let cipher =
        Aes256Gcm::new_from_slice(key_bytes).map_err(|e| anyhow::anyhow!("Failed to create cipher: {}", e))?;

    // Random 96-bit nonce
    let mut nonce_bytes = [0u8; 12];
    rand::rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow::anyhow!("Encryption failed: {}", e))?;

    // nonce + ciphertext, base64 encoded
    let mut result = nonce_bytes.to_vec();
    result.extend_from_slice(&ciphertext);

    Ok(general_purpose::STANDARD.encode(result))
}

/// Decrypts data that was encrypted with [`encrypt_with_key`].
pub fn decrypt_with_key(key_bytes: &[u8], encrypted_b64: &str) -> Result<Vec<u8>, anyhow::Error> {
    let cipher =
        Aes256Gcm::new_from_slice(key_bytes).map_err(|e| anyhow::anyhow!("Failed to create cipher: {}", e))?;

    let encrypted_data = general_purpose::STANDARD
        .decode(encrypted_b64)
        .map_err(|e| anyhow::anyhow!("Failed to decode encrypted data: {}", e))?;

    if encrypted_data.len() < 12 {
        return Err(anyhow::anyhow!("Encrypted data too short"));
    }

    let (nonce_bytes, ciphertext) = encrypted_data.split_at(12);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| anyhow::anyhow!("Decryption failed: {}", e))?;

    Ok(plaintext)
}
