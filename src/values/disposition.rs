//! `DispositionType` (`Content-Disposition`).

use std::fmt;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::{quote_if_needed, split_params};

#[derive(Clone, Debug, PartialEq)]
pub struct DispositionType {
    pub name: String,
    pub params: Vec<(String, String)>,
}

impl DispositionType {
    pub fn parse(text: &str) -> NetResult<Self> {
        let (head, params) = split_params(text)?;
        if head.is_empty() {
            return Err(ParseErrorKind::HeaderValue("content-disposition").into());
        }
        Ok(Self {
            name: head.to_ascii_lowercase(),
            params: params
                .into_iter()
                .filter_map(|p| p.value.map(|v| (p.name.to_ascii_lowercase(), v)))
                .collect(),
        })
    }

    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == "filename")
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.name == "attachment"
    }
}

impl fmt::Display for DispositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (k, v) in &self.params {
            write!(f, "; {k}={}", quote_if_needed(v))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_parses_filename() {
        let d = DispositionType::parse(r#"attachment; filename="report.pdf""#).unwrap();
        assert!(d.is_attachment());
        assert_eq!(d.filename(), Some("report.pdf"));
    }
}
