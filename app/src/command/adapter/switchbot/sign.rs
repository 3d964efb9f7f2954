use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    pub t: String,
    pub nonce: String,
    pub sign: String,
}

/// `sign = base64(HMAC-SHA256(secret, token + t + nonce))`
pub fn sign_request(token: &str, secret: &str, t_millis: i64, nonce: &str) -> anyhow::Result<RequestSignature> {
    let t = t_millis.to_string();

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Error initializing request signer: {}", e))?;
    mac.update(token.as_bytes());
    mac.update(t.as_bytes());
    mac.update(nonce.as_bytes());

    Ok(RequestSignature {
        sign: STANDARD.encode(mac.finalize().into_bytes()),
        t,
        nonce: nonce.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONCE: &str = "0b3d6f2e-1c84-4f4e-9d2a-6b1f0c2e7a11";

    #[test]
    fn known_signature() {
        let signature = sign_request("token-abc", "secret-key", 1_700_000_000_000, NONCE).unwrap();

        assert_eq!(signature.t, "1700000000000");
        assert_eq!(signature.nonce, NONCE);
        assert_eq!(signature.sign, "tK/gv03iiZWC/t6tpepoYTfWzzM5e45Ti89D85fnrXE=");
    }

    #[test]
    fn nonce_changes_signature() {
        let a = sign_request("token-abc", "secret-key", 1_700_000_000_000, "nonce-a").unwrap();
        let b = sign_request("token-abc", "secret-key", 1_700_000_000_000, "nonce-b").unwrap();

        assert_ne!(a.sign, b.sign);
    }
}
