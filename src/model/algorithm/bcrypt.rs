use crate::utils::errors::KeeperError;

// bcrypt consumes a fixed-length salt, so the stored B64 salt is truncated to fit.
const SALT_LENGTH: usize = 16;

///
/// Hash the password into a modular crypt string ($2b$...) under the salt provided.
///
/// The iteration count here is the bcrypt cost exponent (4-31), not a raw round count.
///
pub fn digest(plain_text_password: &str, salt: &str, cost: u32) -> Result<String, KeeperError> {
    let salt: String = salt.chars().take(SALT_LENGTH).collect();
    let hashed = bcrypt::hash_with_salt(plain_text_password, cost, salt.as_bytes())?;

    Ok(hashed.format_for_version(bcrypt::Version::TwoB))
}
