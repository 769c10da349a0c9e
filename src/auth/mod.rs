//! Credential check against the platform's token endpoints

mod token;

pub(crate) use token::validate_credentials;
