//! Uniform result record of every [`crate::ScriptManager`] operation.

use crate::Error;
use std::fmt;

/// What an operation produced, whether it succeeded, and a message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub result: Option<T>,
    pub success: bool,
    pub message: String,
}

impl<T> Outcome<T> {
    pub fn success(result: T, message: impl Into<String>) -> Self {
        Self {
            result: Some(result),
            success: true,
            message: message.into(),
        }
    }

    /// Success that produced nothing worth returning.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            result: None,
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: None,
            success: false,
            message: message.into(),
        }
    }

    /// Turn an operation result into an outcome.
    ///
    /// Named errors keep their own message. Anything else is logged and
    /// reported as `generic`.
    pub fn from_result(
        result: crate::Result<T>,
        generic: &str,
        message: impl FnOnce(&T) -> String,
    ) -> Self {
        match result {
            Ok(value) => {
                let text = message(&value);
                Self::success(value, text)
            }
            Err(err) => Self::from_error(err, generic),
        }
    }

    pub fn from_error(err: Error, generic: &str) -> Self {
        if err.is_domain() {
            Self::failure(err.to_string())
        } else {
            tracing::warn!(error = %err, "{}", generic);
            Self::failure(generic)
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl<T> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_keeps_message() {
        let outcome: Outcome<u32> =
            Outcome::from_result(Err(Error::InvalidDescription), "generic", |_| String::new());
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Invalid description!");
        assert!(outcome.result.is_none());
    }

    #[test]
    fn unexpected_error_uses_generic_message() {
        let err = Error::Io(std::io::Error::other("disk on fire"));
        let outcome: Outcome<u32> = Outcome::from_result(Err(err), "Unable to upload.", |_| {
            String::new()
        });
        assert_eq!(outcome.message, "Unable to upload.");
    }

    #[test]
    fn success_builds_message_from_value() {
        let outcome = Outcome::from_result(Ok(4u32), "generic", |n| {
            format!("Created Version Number {}", n)
        });
        assert!(outcome.is_success());
        assert_eq!(outcome.result, Some(4));
        assert_eq!(outcome.to_string(), "Created Version Number 4");
    }
}
