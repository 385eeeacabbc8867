//! Gemini response: `<status> <meta>\r\n[body]`.

use std::fmt;

pub const MIME_GEMTEXT: &str = "text/gemini; charset=utf-8";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Input = 10,
    Success = 20,
    Redirect = 30,
    TemporaryFailure = 40,
    NotFound = 51,
    BadRequest = 59,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub meta: String,
    pub content: String,
}

impl Default for Response {
    fn default() -> Self {
        Self::success(String::new())
    }
}

impl Response {
    pub fn success(content: String) -> Self {
        Self {
            status: Status::Success,
            meta: MIME_GEMTEXT.to_string(),
            content,
        }
    }

    pub fn with_status<S: Into<String>>(status: Status, meta: S) -> Self {
        Self {
            status,
            meta: meta.into(),
            content: String::new(),
        }
    }

    pub fn redirect<S: Into<String>>(target: S) -> Self {
        Self::with_status(Status::Redirect, target)
    }

    /// Header line; CR/LF in meta would break framing, so they become spaces.
    pub fn header(&self) -> String {
        let meta: String = self
            .meta
            .chars()
            .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
            .collect();
        format!("{} {}\r\n", self.status, meta)
    }

    /// Full wire bytes; body is sent only with a success status.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header().into_bytes();
        if self.status == Status::Success {
            out.extend_from_slice(self.content.as_bytes());
        }
        out
    }
}
