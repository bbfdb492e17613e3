use std::fmt;
use std::ops::Deref;
use thiserror::Error;

/// A staff email address of the form `local@host.tld`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

#[derive(Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("'{0}' is not a valid email: must not contain whitespace")]
    ContainsWhitespace(String),
    #[error("'{0}' is not a valid email: must contain exactly one '@'")]
    InvalidFormat(String),
    #[error("'{0}' is not a valid email: missing local part")]
    MissingLocalPart(String),
    #[error("'{0}' is not a valid email: invalid domain part")]
    InvalidDomainPart(String),
}

impl TryFrom<&str> for Email {
    type Error = EmailError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace(value.to_string()));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(EmailError::InvalidFormat(value.to_string()));
        };
        if domain.contains('@') {
            return Err(EmailError::InvalidFormat(value.to_string()));
        }
        if local.is_empty() {
            return Err(EmailError::MissingLocalPart(value.to_string()));
        }

        let domain_ok = domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
        if !domain_ok {
            return Err(EmailError::InvalidDomainPart(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }
}

impl Deref for Email {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
