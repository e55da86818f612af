use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::RollcallError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username the token was issued to.
    pub sub: String,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// Issues and checks `base64url(claims).base64url(hmac)` bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, username: &str) -> String {
        let claims = Claims {
            sub: username.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> String {
        // Claims is plain strings and integers; serializing it cannot fail.
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap_or_default());
        let signature = URL_SAFE_NO_PAD.encode(self.mac(payload.as_bytes()).finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, RollcallError> {
        let invalid = RollcallError::Unauthorized("invalid token");
        let Some((payload, signature)) = token.split_once('.') else {
            return Err(invalid);
        };
        let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
            return Err(invalid);
        };
        if self.mac(payload.as_bytes()).verify_slice(&signature).is_err() {
            return Err(invalid);
        }
        let claims: Claims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(invalid)?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(RollcallError::Unauthorized("token expired"));
        }
        Ok(claims)
    }

    fn mac(&self, data: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(data);
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let signer = TokenSigner::new("secret", 60);
        let token = signer.issue("admin");
        let claims = signer.verify(&token).expect("token should verify");
        assert_eq!(claims.sub, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenSigner::new("secret", 60).issue("admin");
        let other = TokenSigner::new("other", 60);
        assert!(matches!(
            other.verify(&token),
            Err(RollcallError::Unauthorized("invalid token"))
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = TokenSigner::new("secret", 60);
        let token = signer.issue("teacher");
        let (_, sig) = token.split_once('.').unwrap();
        let forged_claims = Claims {
            sub: "admin".to_string(),
            exp: Utc::now().timestamp() + 3600,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        assert!(signer.verify(&format!("{forged_payload}.{sig}")).is_err());
        assert!(signer.verify("garbage").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new("secret", -1);
        let token = signer.issue("admin");
        assert!(matches!(
            signer.verify(&token),
            Err(RollcallError::Unauthorized("token expired"))
        ));
    }
}
