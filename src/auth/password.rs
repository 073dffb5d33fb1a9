//! Password validation and hashing.

use std::fmt::Display;

use bcrypt::{DEFAULT_COST, hash, verify};
use zxcvbn::{Score, zxcvbn};

use crate::error::Error;

/// A password that meets the minimum strength requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check that `raw_password` is strong enough to use.
    ///
    /// `user_inputs` should contain the username and email so that passwords
    /// based on them are penalised.
    ///
    /// # Errors
    /// Returns [Error::TooWeak] with a suggestion on how to make the password
    /// stronger.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, user_inputs);

        match entropy.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => {
                let suggestion = entropy
                    .feedback()
                    .and_then(|feedback| feedback.suggestions().first().map(|s| s.to_string()))
                    .unwrap_or_else(|| "Try a longer password.".to_owned());

                Err(Error::TooWeak(suggestion))
            }
        }
    }
}

/// The bcrypt hash of a validated password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// A low bcrypt cost for use in tests, where hashing speed matters more
    /// than hash strength.
    pub const TEST_COST: u32 = 4;

    /// Hash a validated password with the given bcrypt `cost`.
    ///
    /// Use [bcrypt::DEFAULT_COST] outside of tests.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        let hash = hash(password.0, cost).map_err(|error| Error::HashingError(error.to_string()))?;

        Ok(Self(hash))
    }

    /// Hash a validated password with the default bcrypt cost.
    pub fn from_validated_password(password: ValidatedPassword) -> Result<Self, Error> {
        Self::new(password, DEFAULT_COST)
    }

    /// Wrap a hash string that was previously stored in the database.
    ///
    /// The string is assumed to be a valid bcrypt hash.
    pub fn new_unchecked(hash: String) -> Self {
        Self(hash)
    }

    /// Check `raw_password` against this hash.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentials] if the password does not match.
    pub fn verify(&self, raw_password: &str) -> Result<(), Error> {
        let matches = verify(raw_password, &self.0)
            .map_err(|error| Error::HashingError(error.to_string()))?;

        if matches {
            Ok(())
        } else {
            Err(Error::InvalidCredentials)
        }
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod password_hash_tests {
    use crate::error::Error;

    use super::{PasswordHash, ValidatedPassword};

    fn test_hash(raw_password: &str) -> PasswordHash {
        let password = ValidatedPassword::new(raw_password, &[]).expect("weak password");

        PasswordHash::new(password, PasswordHash::TEST_COST).expect("could not hash password")
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hash = test_hash("correct-horse-battery-staple");

        assert!(hash.verify("correct-horse-battery-staple").is_ok());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = test_hash("correct-horse-battery-staple");

        assert_eq!(
            hash.verify("incorrect-horse").expect_err("wrong password should be rejected"),
            Error::InvalidCredentials
        );
    }

    #[test]
    fn hash_does_not_contain_password() {
        let hash = test_hash("correct-horse-battery-staple");

        assert!(!hash.to_string().contains("correct-horse-battery-staple"));
    }
}
