use std::env;

use crate::InspectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityInput {
    IdToken(String),
    UserId(String),
    Stdin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectConfig {
    pub output: OutputFormat,
    pub show_claims: bool,
    pub input: IdentityInput,
}

impl InspectConfig {
    pub fn load() -> Result<Self, InspectError> {
        Self::from_sources(env::args().skip(1), |name| env::var(name).ok())
    }

    pub fn from_sources(
        args: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, InspectError> {
        let output = match lookup("IDKIT_OUTPUT")
            .map(|value| value.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("summary") => OutputFormat::Summary,
            Some("json") => OutputFormat::Json,
            Some(other) => {
                return Err(InspectError::Config(format!(
                    "invalid IDKIT_OUTPUT value '{other}': expected 'summary' or 'json'"
                )));
            }
        };

        let show_claims = lookup("IDKIT_SHOW_CLAIMS")
            .unwrap_or_else(|| "false".to_owned())
            .trim()
            .eq_ignore_ascii_case("true");

        let mut args = args.into_iter();
        let input = match args.next().as_deref() {
            Some("--user-id") => {
                let user_id = args.next().ok_or_else(|| {
                    InspectError::Config("--user-id requires a value".to_owned())
                })?;
                IdentityInput::UserId(user_id)
            }
            Some(flag) if flag.starts_with("--") => {
                return Err(InspectError::Config(format!("unknown option '{flag}'")));
            }
            Some(token) => IdentityInput::IdToken(token.to_owned()),
            None => lookup("IDKIT_ID_TOKEN")
                .filter(|value| !value.trim().is_empty())
                .map_or(IdentityInput::Stdin, IdentityInput::IdToken),
        };

        if let Some(extra) = args.next() {
            return Err(InspectError::Config(format!(
                "unexpected argument '{extra}'"
            )));
        }

        Ok(Self {
            output,
            show_claims,
            input,
        })
    }
}
