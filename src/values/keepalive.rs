//! `KeepAliveParameters` (`Keep-Alive`).

use std::fmt;

use crate::errors::NetResult;
use crate::grammar::split_list;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeepAliveParameters {
    pub timeout: Option<u64>,
    pub max: Option<u64>,
}

impl KeepAliveParameters {
    /// `Keep-Alive`'s parameters are comma-separated, unlike the
    /// semicolon-separated parameters most other header values use.
    pub fn parse(text: &str) -> NetResult<Self> {
        let mut timeout = None;
        let mut max = None;
        for item in split_list(text) {
            let Some((name, value)) = item.split_once('=') else {
                continue;
            };
            match name.trim().to_ascii_lowercase().as_str() {
                "timeout" => timeout = value.trim().parse().ok(),
                "max" => max = value.trim().parse().ok(),
                _ => {}
            }
        }
        Ok(Self { timeout, max })
    }
}

impl fmt::Display for KeepAliveParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(timeout) = self.timeout {
            parts.push(format!("timeout={timeout}"));
        }
        if let Some(max) = self.max {
            parts.push(format!("max={max}"));
        }
        f.write_str(&parts.join(", "))
    }
}
