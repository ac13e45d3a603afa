//! `Challenge` (`WWW-Authenticate`/`Proxy-Authenticate`) and `Credentials`
//! (`Authorization`/`Proxy-Authorization`).

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::{NetResult, ParseErrorKind};
use crate::grammar::{parse_quoted_string, quote_if_needed};

/// Auth parameters: names compared case-insensitively; `realm` is emitted
/// first when formatting.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AuthParams(pub Vec<(String, String)>);

impl AuthParams {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `auth-param *( OWS "," OWS auth-param )` — comma-separated, unlike
    /// the semicolon-separated parameters on most other header values.
    fn parse(rest: &str) -> Self {
        let pairs = crate::grammar::split_list(rest)
            .into_iter()
            .filter_map(|item| {
                let (name, value) = item.split_once('=')?;
                let value = value.trim();
                let value = if value.starts_with('"') {
                    parse_quoted_string(value).unwrap_or_else(|_| value.to_string())
                } else {
                    value.to_string()
                };
                Some((name.trim().to_string(), value))
            })
            .collect();
        Self(pairs)
    }
}

impl fmt::Display for AuthParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<_> = self.0.iter().collect();
        items.sort_by_key(|(k, _)| if k.eq_ignore_ascii_case("realm") { 0 } else { 1 });
        for (i, (k, v)) in items.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={}", quote_if_needed(v))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Challenge {
    Basic {
        realm: String,
        params: AuthParams,
    },
    Bearer {
        realm: Option<String>,
        scope: Vec<String>,
        error: Option<String>,
        error_description: Option<String>,
        params: AuthParams,
    },
    Default {
        scheme: String,
        params: AuthParams,
    },
}

impl Challenge {
    pub fn parse(text: &str) -> NetResult<Self> {
        let text = text.trim();
        let (scheme, rest) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));
        let params = AuthParams::parse(rest.trim());

        match scheme.to_ascii_lowercase().as_str() {
            "basic" => {
                let realm = params
                    .get("realm")
                    .ok_or(ParseErrorKind::HeaderValue("basic-challenge"))?
                    .to_string();
                Ok(Self::Basic { realm, params })
            }
            "bearer" => {
                let scope = params
                    .get("scope")
                    .map(|s| s.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();
                Ok(Self::Bearer {
                    realm: params.get("realm").map(str::to_string),
                    scope,
                    error: params.get("error").map(str::to_string),
                    error_description: params.get("error_description").map(str::to_string),
                    params,
                })
            }
            other => Ok(Self::Default {
                scheme: other.to_string(),
                params,
            }),
        }
    }

    /// Splits a comma-separated challenge list on scheme boundaries (a new
    /// scheme token not followed by `=` starts a new challenge) and parses
    /// each.
    pub fn parse_all(text: &str) -> Vec<Self> {
        split_challenges(text)
            .iter()
            .filter_map(|s| Self::parse(s).ok())
            .collect()
    }

    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::Bearer { error: Some(e), .. } if e == "invalid_request")
    }

    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, Self::Bearer { error: Some(e), .. } if e == "invalid_token")
    }

    #[must_use]
    pub fn is_insufficient_scope(&self) -> bool {
        matches!(self, Self::Bearer { error: Some(e), .. } if e == "insufficient_scope")
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { realm, .. } => write!(f, "Basic realm={}", quote_if_needed(realm)),
            Self::Bearer { params, .. } => write!(f, "Bearer {params}"),
            Self::Default { scheme, params } => {
                if params.0.is_empty() {
                    write!(f, "{scheme}")
                } else {
                    write!(f, "{scheme} {params}")
                }
            }
        }
    }
}

/// Splits `"Basic realm=\"a\", Bearer realm=\"b\""`-shaped text into
/// per-scheme substrings. A bare token not followed by `=` (ignoring
/// quoted content) begins a new challenge.
fn split_challenges(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for token in tokenize_commas_respecting_quotes(text) {
        let trimmed = token.trim();
        let looks_like_new_scheme = trimmed
            .split_whitespace()
            .next()
            .is_some_and(|w| !w.contains('='));

        if looks_like_new_scheme && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str(", ");
        }
        current.push_str(trimmed);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn tokenize_commas_respecting_quotes(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                out.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(s[start..].trim());
    out
}

#[derive(Clone, Debug, PartialEq)]
pub enum Credentials {
    Basic { user: String, password: String },
    Bearer { token: String },
    Default { scheme: String, token: String },
}

impl Credentials {
    #[must_use]
    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn parse(text: &str) -> NetResult<Self> {
        let text = text.trim();
        let (scheme, token) = text
            .split_once(char::is_whitespace)
            .ok_or(ParseErrorKind::HeaderValue("credentials"))?;
        let token = token.trim();

        match scheme.to_ascii_lowercase().as_str() {
            "basic" => {
                let decoded = BASE64
                    .decode(token)
                    .map_err(|_| ParseErrorKind::HeaderValue("basic-credentials"))?;
                let decoded = String::from_utf8(decoded)
                    .map_err(|_| ParseErrorKind::HeaderValue("basic-credentials"))?;
                let (user, password) = decoded
                    .split_once(':')
                    .ok_or(ParseErrorKind::HeaderValue("basic-credentials"))?;
                Ok(Self::Basic {
                    user: user.to_string(),
                    password: password.to_string(),
                })
            }
            "bearer" => Ok(Self::Bearer {
                token: token.to_string(),
            }),
            other => Ok(Self::Default {
                scheme: other.to_string(),
                token: token.to_string(),
            }),
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { user, password } => {
                let encoded = BASE64.encode(format!("{user}:{password}"));
                write!(f, "Basic {encoded}")
            }
            Self::Bearer { token } => write!(f, "Bearer {token}"),
            Self::Default { scheme, token } => write!(f, "{scheme} {token}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_credentials_round_trip() {
        let creds = Credentials::basic("Aladdin", "open sesame");
        assert_eq!(creds.to_string(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");

        let parsed = Credentials::parse(&creds.to_string()).unwrap();
        match parsed {
            Credentials::Basic { user, password } => {
                assert_eq!(user, "Aladdin");
                assert_eq!(password, "open sesame");
            }
            _ => panic!("expected Basic credentials"),
        }
    }

    #[test]
    fn bearer_challenge_parses_error_classifiers() {
        let challenges = Challenge::parse_all(
            r#"Bearer realm="api", error="invalid_token", error_description="Expired""#,
        );
        assert_eq!(challenges.len(), 1);
        let Challenge::Bearer { realm, error, scope, .. } = &challenges[0] else {
            panic!("expected Bearer challenge");
        };
        assert_eq!(realm.as_deref(), Some("api"));
        assert_eq!(error.as_deref(), Some("invalid_token"));
        assert!(challenges[0].is_invalid_token());
        assert!(scope.is_empty());
    }

    #[test]
    fn basic_challenge_requires_realm() {
        assert!(Challenge::parse("Basic").is_err());
        let c = Challenge::parse(r#"Basic realm="secure area""#).unwrap();
        match c {
            Challenge::Basic { realm, .. } => assert_eq!(realm, "secure area"),
            _ => panic!("expected Basic challenge"),
        }
    }

    #[test]
    fn multiple_challenges_split_on_scheme_boundary() {
        let challenges =
            Challenge::parse_all(r#"Basic realm="a", Bearer realm="b", error="invalid_request""#);
        assert_eq!(challenges.len(), 2);
    }
}
