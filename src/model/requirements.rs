use serde::{Deserialize, Serialize};
use crate::utils::errors::{ErrorCode, KeeperError};

pub const SPECIAL_CHARACTERS: &str = "~!@#$%^&*()_+{}\":;'[]";

///
/// Character-composition requirements for a new password.
///
/// Stateless: unlike the reuse policy there is no history, no store and no
/// concurrency to worry about - just minimum counts over the candidate string.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CharacterPolicy {
    pub min_numbers: u32,
    pub min_letters: u32,
    pub min_uppercase: u32,
    pub min_lowercase: u32,
    pub min_symbols: u32,
    pub special_characters: String,
}

impl Default for CharacterPolicy {
    fn default() -> Self {
        CharacterPolicy {
            min_numbers: 1,
            min_letters: 1,
            min_uppercase: 1,
            min_lowercase: 1,
            min_symbols: 1,
            special_characters: SPECIAL_CHARACTERS.to_string(),
        }
    }
}

impl CharacterPolicy {
    ///
    /// Check the plain text password meets every minimum.
    ///
    /// Unlike the reuse validator, which raises at most one violation per call, every
    /// unmet requirement is reported so the caller can show them all at once.
    ///
    pub fn validate(&self, plain_text_password: &str) -> Result<(), Vec<KeeperError>> {
        let mut violations = vec!();

        let numbers = plain_text_password.chars().filter(|c| c.is_numeric()).count();
        if numbers < self.min_numbers as usize {
            violations.push(ErrorCode::NotEnoughNumbers
                .with_msg(&format!("a password must contain at least {} digits", self.min_numbers)));
        }

        let letters = plain_text_password.chars().filter(|c| c.is_alphabetic()).count();
        if letters < self.min_letters as usize {
            violations.push(ErrorCode::NotEnoughLetters
                .with_msg(&format!("a password must contain at least {} letters", self.min_letters)));
        }

        let uppercase = plain_text_password.chars().filter(|c| c.is_uppercase()).count();
        if uppercase < self.min_uppercase as usize {
            violations.push(ErrorCode::NotEnoughUppercase
                .with_msg(&format!("a password must contain at least {} upper case letters", self.min_uppercase)));
        }

        let lowercase = plain_text_password.chars().filter(|c| c.is_lowercase()).count();
        if lowercase < self.min_lowercase as usize {
            violations.push(ErrorCode::NotEnoughLowercase
                .with_msg(&format!("a password must contain at least {} lower case letters", self.min_lowercase)));
        }

        let symbols = plain_text_password.chars().filter(|c| self.special_characters.contains(*c)).count();
        if symbols < self.min_symbols as usize {
            violations.push(ErrorCode::NotEnoughSymbols
                .with_msg(&format!("a password must contain at least {} special characters, such as {}",
                    self.min_symbols, self.special_characters)));
        }

        match violations.is_empty() {
            true  => Ok(()),
            false => Err(violations),
        }
    }

    ///
    /// A description of every active requirement, for help-text display.
    ///
    pub fn help_text(&self) -> String {
        let mut required = vec!();

        if self.min_numbers > 0 {
            required.push(format!("{} digits", self.min_numbers));
        }
        if self.min_letters > 0 {
            required.push(format!("{} letters", self.min_letters));
        }
        if self.min_uppercase > 0 {
            required.push(format!("{} upper case letters", self.min_uppercase));
        }
        if self.min_lowercase > 0 {
            required.push(format!("{} lower case letters", self.min_lowercase));
        }
        if self.min_symbols > 0 {
            required.push(format!("{} special characters such as {}", self.min_symbols, self.special_characters));
        }

        format!("Your password must contain at least {}", required.join(", "))
    }
}
