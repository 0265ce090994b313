use pbkdf2::Pbkdf2;
use pbkdf2::password_hash::{PasswordHasher, Salt};
use crate::utils::errors::KeeperError;

const OUTPUT_LENGTH: usize = 32; // Derived key length in bytes.

///
/// Hash the password into a PHC string ($pbkdf2-sha256$...) under the salt provided.
///
pub fn digest(plain_text_password: &str, salt: &str, rounds: u32) -> Result<String, KeeperError> {
    let salt = Salt::new(salt)?;
    let params = pbkdf2::Params {
        rounds,
        output_length: OUTPUT_LENGTH,
    };

    Ok(Pbkdf2.hash_password_customized(
        plain_text_password.as_bytes(),
        None,
        None,
        params,
        salt)?.to_string())
}
