use argon2::{password_hash::{self, SaltString}, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::AppResult;

/// Verified against when the username is unknown, so a miss costs as much as a wrong password.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

pub async fn hash_password(password: String) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || -> Result<String, password_hash::Error> {
        let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())?;
        Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
    }).await??;

    Ok(hash)
}

/// Constant-time check of `password` against a stored PHC string.
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    let valid = tokio::task::spawn_blocking(move || -> Result<bool, password_hash::Error> {
        let parsed = PasswordHash::new(&hash)?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    }).await??;

    Ok(valid)
}

pub async fn burn_verification(password: String) -> AppResult<()> {
    verify_password(password, DUMMY_HASH.to_owned()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("pw123456".to_owned()).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw123456".to_owned(), hash.clone()).await.unwrap());
        assert!(!verify_password("pw1234567".to_owned(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let a = hash_password("same".to_owned()).await.unwrap();
        let b = hash_password("same".to_owned()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn dummy_hash_parses_and_never_matches() {
        assert!(!verify_password("".to_owned(), DUMMY_HASH.to_owned()).await.unwrap());
        burn_verification("anything".to_owned()).await.unwrap();
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(verify_password("pw".to_owned(), "not a hash".to_owned()).await.is_err());
    }
}
