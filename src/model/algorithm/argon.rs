use std::convert::TryFrom;
use crate::utils::errors::KeeperError;

// Fixed parameters - the (algorithm, iterations, salt) binding tuple alone must
// determine the digest, so everything else is pinned here.
const MEMORY_SIZE_KB: u32 = 1024 * 16;
const PARALLELISM: u32 = 1;
const VERSION: u32 = 19;

///
/// Hash the password into a PHC string ($argon2id$v=19$...) under the salt provided.
///
pub fn digest(plain_text_password: &str, salt: &str, iterations: u32) -> Result<String, KeeperError> {
    let argon2 = argon2::Argon2::new(
        None,
        iterations,
        MEMORY_SIZE_KB,
        PARALLELISM,
        argon2::Version::try_from(VERSION)?)?;

    Ok(argon2::PasswordHasher::hash_password_simple(&argon2, plain_text_password.as_bytes(), salt)?.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::algorithm::generate_salt;

    #[test]
    fn test_digest_is_deterministic_per_salt() -> Result<(), KeeperError> {
        let salt = generate_salt();

        assert_eq!(digest("wibble", &salt, 1)?, digest("wibble", &salt, 1)?);
        assert_ne!(digest("wibble", &salt, 1)?, digest("wobble", &salt, 1)?);
        assert_ne!(digest("wibble", &salt, 1)?, digest("wibble", &generate_salt(), 1)?);
        Ok(())
    }
}
