//! Command-line inspector for identity-provider id_tokens.

#![forbid(unsafe_code)]

mod inspect_config;
mod render;

use std::io::Read;
use std::process::ExitCode;

use idkit_core::IdentityError;
use idkit_domain::UserInformation;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use inspect_config::{IdentityInput, InspectConfig};

#[derive(Debug, Error)]
pub(crate) enum InspectError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("failed to read id_token from stdin: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(error) => {
            error!(error = %error, "idkit-inspect failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, InspectError> {
    let config = InspectConfig::load()?;
    let resolved = match &config.input {
        IdentityInput::IdToken(token) => UserInformation::from_id_token(token.trim()),
        IdentityInput::UserId(user_id) => UserInformation::from_user_id(user_id),
        IdentityInput::Stdin => {
            let mut token = String::new();
            std::io::stdin().read_to_string(&mut token)?;
            UserInformation::from_id_token(token.trim())
        }
    };

    match &resolved {
        Ok(information) => info!(
            user_id_displayable = information.user_id_displayable(),
            claim_count = information.all_claims().map_or(0, |claims| claims.len()),
            "user information resolved"
        ),
        Err(error) => warn!(kind = %error.kind(), "could not resolve user information"),
    }

    let report = render::render_outcome(&resolved, config.output, config.show_claims)?;
    println!("{}", report.text);

    Ok(if report.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
