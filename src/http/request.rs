//! Request line parsing

use std::fmt;

use crate::error::{Result, ZeroError};

/// Request method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    /// Any method this server does not implement
    Other(String),
}

impl Method {
    /// Methods are matched case-sensitively, as sent
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First line of a request: `METHOD SP PATH [SP version]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub path: String,
}

impl RequestLine {
    /// Split on runs of whitespace; tokens after the path are ignored
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();

        let method = parts
            .next()
            .ok_or_else(|| ZeroError::BadRequest("empty request line".to_string()))?;
        let path = parts
            .next()
            .ok_or_else(|| ZeroError::BadRequest(format!("missing path in {:?}", line)))?;

        Ok(Self {
            method: Method::from_token(method),
            path: path.to_string(),
        })
    }
}
