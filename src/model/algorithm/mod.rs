pub mod argon;
pub mod bcrypt;
pub mod pbkdf2;

use rand_core::OsRng;
use std::str::FromStr;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use password_hash::SaltString;
use crate::utils::errors::{ErrorCode, KeeperError};

#[derive(Clone, Copy, Debug, Deserialize, Display, Serialize, PartialEq)]
pub enum Algorithm {
    Argon,
    BCrypt,
    PBKDF2,
}


///
/// Digest the plain text password under the salt and work factor provided.
///
/// Deterministic: the same (algorithm, iterations, salt, password) always produces
/// the same digest string, so stored digests can be compared by value. The actual
/// cryptographic strength is delegated to the algorithm crates.
///
pub fn digest(algorithm: Algorithm, plain_text_password: &str, salt: &str, iterations: u32)
    -> Result<String, KeeperError> {

    match algorithm {
        Algorithm::Argon  => argon::digest(plain_text_password, salt, iterations),
        Algorithm::BCrypt => bcrypt::digest(plain_text_password, salt, iterations),
        Algorithm::PBKDF2 => pbkdf2::digest(plain_text_password, salt, iterations),
    }
}

///
/// Generate a fresh random salt in the B64 form every algorithm here accepts.
///
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).as_str().to_string()
}

impl FromStr for Algorithm {
    type Err = KeeperError;

    fn from_str(input: &str) -> Result<Algorithm, Self::Err> {
        match input.to_lowercase().as_str() {
            "argon"    |
            "argon2i"  |
            "argon2d"  |
            "argon2id" => Ok(Algorithm::Argon),

            "bcrypt" => Ok(Algorithm::BCrypt),

            "pbkdf2" |
            "pbkdf2-sha256" => Ok(Algorithm::PBKDF2),

            _ => Err(ErrorCode::UnknownAlgorithmVariant.with_msg(&format!("algorithm {} is un-handled", input))),
        }
    }
}


#[cfg(test)]
mod tests {
    // Note this useful idiom: importing names from outer (for mod tests) scope.
    use super::*;

    #[test]
    fn test_algorithms_parse_from_config_names() -> Result<(), KeeperError> {
        assert_eq!(Algorithm::from_str("argon")?, Algorithm::Argon);
        assert_eq!(Algorithm::from_str("argon2id")?, Algorithm::Argon);
        assert_eq!(Algorithm::from_str("BCrypt")?, Algorithm::BCrypt);
        assert_eq!(Algorithm::from_str("pbkdf2-sha256")?, Algorithm::PBKDF2);
        assert!(Algorithm::from_str("md5").is_err());
        Ok(())
    }

    #[test]
    fn test_generated_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
