//! `Preference` (`Prefer`/`Preference-Applied`).

use std::fmt;

use crate::errors::NetResult;
use crate::grammar::{quote_if_needed, split_list, split_params};

#[derive(Clone, Debug, PartialEq)]
pub struct Preference {
    pub name: String,
    pub value: Option<String>,
    pub params: Vec<(String, String)>,
}

impl Preference {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        let (name, value) = match head.split_once('=') {
            Some((n, v)) => (n.trim().to_ascii_lowercase(), Some(v.trim().trim_matches('"').to_string())),
            None => (head.trim().to_ascii_lowercase(), None),
        };
        Ok(Self {
            name,
            value,
            params: params
                .into_iter()
                .filter_map(|p| p.value.map(|v| (p.name.to_ascii_lowercase(), v)))
                .collect(),
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        split_list(text).iter().map(|s| Self::parse(s)).collect()
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(value) = &self.value {
            write!(f, "={}", quote_if_needed(value))?;
        }
        for (k, v) in &self.params {
            write!(f, "; {k}={}", quote_if_needed(v))?;
        }
        Ok(())
    }
}
