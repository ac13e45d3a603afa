//! `CharsetRange`.

use std::fmt;

use crate::errors::NetResult;
use crate::grammar::{parse_qvalue, split_params};
use crate::values::media::format_weight;
use crate::values::DEFAULT_WEIGHT;

#[derive(Clone, Debug, PartialEq)]
pub struct CharsetRange {
    pub name: String,
    pub weight: f32,
}

impl CharsetRange {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        let mut weight = DEFAULT_WEIGHT;
        for p in params {
            if p.name.eq_ignore_ascii_case("q") {
                if let Some(v) = p.value {
                    weight = parse_qvalue(&v)?;
                }
            }
        }
        Ok(Self {
            name: head.to_ascii_lowercase(),
            weight,
        })
    }

    pub fn parse_all(text: &str) -> NetResult<Vec<Self>> {
        crate::grammar::split_list(text)
            .iter()
            .map(|s| Self::parse(s))
            .collect()
    }

    #[must_use]
    pub fn matches(&self, charset: &str) -> bool {
        self.name == "*" || self.name.eq_ignore_ascii_case(charset)
    }
}

impl fmt::Display for CharsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if (self.weight - DEFAULT_WEIGHT).abs() > f32::EPSILON {
            write!(f, ";q={}", format_weight(self.weight))?;
        }
        Ok(())
    }
}
