use mongodb::bson;
use tokio::task::JoinError;
use bcrypt::BcryptError;
use bson::document::ValueAccessError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorCode {
    HashThreadingIssue              = 0401,
    ConfigurationInvalid            = 0500,
    MongoDBError                    = 0503,
    InvalidBSON                     = 0504,
    InvalidJSON                     = 0505,
    BSONFieldNotFound               = 0507,
    InvalidAlgorithmConfig          = 0508,
    HashingError                    = 0509,
    UnknownAlgorithmVariant         = 0511,
    NotEnoughLetters                = 2005,
    NotEnoughNumbers                = 2007,
    NotEnoughSymbols                = 2009,
    PasswordUsedBefore              = 2012,
    NotEnoughUppercase              = 2013,
    NotEnoughLowercase              = 2014,
}

impl ErrorCode {
    pub fn with_msg(&self, message: &str) -> KeeperError {
        KeeperError::new(*self, message)
    }

    ///
    /// The stable, machine-readable code surfaced to the caller alongside the
    /// human-readable message.
    ///
    pub fn code(&self) -> &'static str {
        use ErrorCode::*;

        match self {
            PasswordUsedBefore => "password_used",
            NotEnoughNumbers   => "min_length_digit",
            NotEnoughLetters   => "min_length_alpha",
            NotEnoughUppercase => "min_length_upper_characters",
            NotEnoughLowercase => "min_length_lower_characters",
            NotEnoughSymbols   => "min_length_special_characters",

            HashThreadingIssue      |
            ConfigurationInvalid    |
            MongoDBError            |
            InvalidBSON             |
            InvalidJSON             |
            BSONFieldNotFound       |
            InvalidAlgorithmConfig  |
            HashingError            |
            UnknownAlgorithmVariant => "internal_error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeeperError {
    error_code: ErrorCode,
    message: String,
}

impl KeeperError {
    pub fn new(error_code: ErrorCode, message: &str) -> Self {
        KeeperError { error_code, message: message.to_string() }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for KeeperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code.code(), self.message)
    }
}

impl std::error::Error for KeeperError {}

impl From<config::ConfigError> for KeeperError {
    fn from(error: config::ConfigError) -> Self {
        ErrorCode::ConfigurationInvalid.with_msg(&format!("Unable to load configuration: {}", error))
    }
}

impl From<argon2::Error> for KeeperError {
    fn from(error: argon2::Error) -> Self {
        ErrorCode::InvalidAlgorithmConfig.with_msg(&format!("Invalid configuration for algorithm: {}", error))
    }
}

// Covers argon2 and pbkdf2 alike - both re-export this error type.
impl From<password_hash::Error> for KeeperError {
    fn from(error: password_hash::Error) -> Self {
        ErrorCode::HashingError.with_msg(&format!("Unable to hash password: {}", error))
    }
}

impl From<BcryptError> for KeeperError {
    fn from(error: BcryptError) -> Self {
        ErrorCode::InvalidAlgorithmConfig.with_msg(&format!("Unable to hash password: {}", error))
    }
}

impl From<serde_json::Error> for KeeperError {
    fn from(error: serde_json::Error) -> Self {
        ErrorCode::InvalidJSON.with_msg(&format!("Unable to convert to json: {}", error))
    }
}

impl From<mongodb::error::Error> for KeeperError {
    fn from(error: mongodb::error::Error) -> Self {
        ErrorCode::MongoDBError.with_msg(&format!("MongoDB error: {}", error))
    }
}

impl From<ValueAccessError> for KeeperError {
    fn from(error: ValueAccessError) -> Self {
        ErrorCode::BSONFieldNotFound.with_msg(&format!("Unable to read BSON: {}", error))
    }
}

impl From<bson::ser::Error> for KeeperError {
    fn from(error: bson::ser::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to serialise BSON: {}", error))
    }
}

impl From<bson::de::Error> for KeeperError {
    fn from(error: bson::de::Error) -> Self {
        ErrorCode::InvalidBSON.with_msg(&format!("Unable to deserialise BSON: {}", error))
    }
}

impl From<JoinError> for KeeperError {
    fn from(error: JoinError) -> Self {
        ErrorCode::HashThreadingIssue.with_msg(&format!("Unable to hash: {}", error))
    }
}
