//! Account password hashing.
//!
//! Stored hashes are Argon2id PHC strings (`$argon2id$v=19$...`), carrying
//! their own salt and cost parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

fn hasher() -> Argon2<'static> {
    Argon2::default()
}

/// Hash an account password for storage in `users.password_hash`.
pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
}

/// Check a login attempt against a stored hash.
///
/// A wrong password is `Ok(false)`. `Err` means the stored value is not a
/// usable PHC string.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, password_hash::Error> {
    let stored = PasswordHash::new(stored)?;
    match hasher().verify_password(plain.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_is_argon2id_and_verifies() {
        let stored = hash_password("rosebud-1941").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("rosebud-1941", &stored).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let stored = hash_password("rosebud-1941").unwrap();
        assert!(!verify_password("Rosebud-1941", &stored).unwrap());
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn unusable_stored_value_is_error() {
        assert!(verify_password("anything", "unused").is_err());
    }
}
