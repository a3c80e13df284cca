//
// error.rs
// Distributed under terms of the MIT license.
//

use std::{error::Error, fmt};

#[derive(Debug)]
pub enum NofanError {
    Unauthenticated,
    AuthenticationFailed(String),
    AccountNotFound(String),
    MalformedStatus(String),
    ApiError(String),
    OauthError(reqwest_oauth1::Error),
    ReqwestError(reqwest::Error),
    IoError(String),
    ParseError(String),
    CorruptState(String),
    UnsupportedPlatform(String),
}

impl fmt::Display for NofanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Not logged in"),
            Self::AuthenticationFailed(e) => write!(f, "{}", e),
            Self::AccountNotFound(name) => write!(f, "{} needs login", name),
            Self::MalformedStatus(id) => write!(f, "Malformed status: {}", id),
            Self::ApiError(e) => write!(f, "{}", e),
            Self::OauthError(e) => write!(f, "oauth1 error: {}", e),
            Self::ReqwestError(e) => write!(f, "request error: {}", e),
            Self::IoError(s) => write!(f, "Invalid file: {}", s),
            Self::ParseError(e) => write!(f, "Parse data error: {}", e),
            Self::CorruptState(s) => write!(f, "Corrupt state file: {}", s),
            Self::UnsupportedPlatform(s) => write!(f, "{}", s),
        }
    }
}

impl Error for NofanError {}
