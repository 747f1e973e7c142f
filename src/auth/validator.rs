use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};

/// Which of the two persisted token artifacts is being checked.
///
/// The safety margin differs per kind: an access token about to be handed
/// to a caller must survive at least one more network round-trip, and a
/// refresh token must survive the exchange it is about to be spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn safety_margin(self) -> Duration {
        match self {
            TokenKind::Access => Duration::seconds(30),
            TokenKind::Refresh => Duration::seconds(60),
        }
    }
}

/// Decide whether a bearer token string is still usable.
///
/// The token is decoded as a JWT without verifying its signature; only the
/// `exp` claim matters here. Anything that does not decode to a JWT with a
/// numeric `exp` is invalid: empty strings, opaque tokens, garbage.
/// A token counts as valid only while `exp - margin` is still in the future.
pub fn is_valid(token: &str, kind: TokenKind) -> bool {
    match expiry_claim(token) {
        // Checked subtraction: an exp near the representable minimum must
        // read as invalid, not overflow.
        Some(exp) => exp
            .checked_sub_signed(kind.safety_margin())
            .is_some_and(|cutoff| Utc::now() < cutoff),
        None => false,
    }
}

/// Extract the `exp` claim from an unverified JWT payload.
fn expiry_claim(token: &str) -> Option<chrono::DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let payload_bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    chrono::DateTime::from_timestamp(exp, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"tester","exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn empty_string_is_invalid() {
        assert!(!is_valid("", TokenKind::Access));
        assert!(!is_valid("", TokenKind::Refresh));
    }

    #[test]
    fn non_jwt_string_is_invalid() {
        assert!(!is_valid("opaque-bearer-token", TokenKind::Access));
        assert!(!is_valid("a.b", TokenKind::Access));
        assert!(!is_valid("a.b.c.d", TokenKind::Access));
    }

    #[test]
    fn jwt_without_exp_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"tester"}"#);
        let token = format!("{header}.{payload}.sig");
        assert!(!is_valid(&token, TokenKind::Access));
    }

    #[test]
    fn jwt_with_non_numeric_exp_is_invalid() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"exp":"tomorrow"}"#);
        let token = format!("{header}.{payload}.sig");
        assert!(!is_valid(&token, TokenKind::Access));
    }

    #[test]
    fn expired_jwt_is_invalid() {
        let token = jwt_with_exp(Utc::now().timestamp() - 10);
        assert!(!is_valid(&token, TokenKind::Access));
        assert!(!is_valid(&token, TokenKind::Refresh));
    }

    #[test]
    fn jwt_expiring_within_access_margin_is_invalid() {
        let token = jwt_with_exp(Utc::now().timestamp() + 25);
        assert!(!is_valid(&token, TokenKind::Access));
    }

    #[test]
    fn jwt_expiring_within_refresh_margin_is_invalid() {
        // Past the 30 s access margin but inside the 60 s refresh margin.
        let token = jwt_with_exp(Utc::now().timestamp() + 45);
        assert!(is_valid(&token, TokenKind::Access));
        assert!(!is_valid(&token, TokenKind::Refresh));
    }

    #[test]
    fn jwt_with_minimum_representable_exp_is_invalid() {
        // chrono's minimum timestamp; subtracting the margin from it must
        // not overflow, the token is simply invalid.
        let token = jwt_with_exp(-8_334_601_228_800);
        assert!(!is_valid(&token, TokenKind::Access));
        assert!(!is_valid(&token, TokenKind::Refresh));
    }

    #[test]
    fn jwt_just_past_margin_is_valid_for_both_kinds() {
        let access = jwt_with_exp(Utc::now().timestamp() + 30 + 2);
        let refresh = jwt_with_exp(Utc::now().timestamp() + 60 + 2);
        assert!(is_valid(&access, TokenKind::Access));
        assert!(is_valid(&refresh, TokenKind::Refresh));
    }
}
