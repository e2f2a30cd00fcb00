use idkit_core::{IdentityError, IdentityErrorKind, IdentityResult};
use idkit_domain::UserInformation;
use serde::Serialize;

use crate::InspectError;
use crate::inspect_config::OutputFormat;

const LABEL_WIDTH: usize = 19;

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    error: IdentityErrorKind,
    message: &'a str,
}

/// Text written to stdout together with whether resolution succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    pub succeeded: bool,
}

pub fn render_outcome(
    resolved: &IdentityResult<UserInformation>,
    output: OutputFormat,
    show_claims: bool,
) -> Result<Report, InspectError> {
    match resolved {
        Ok(information) => Ok(Report {
            text: render_identity(information, output, show_claims)?,
            succeeded: true,
        }),
        Err(error) => Ok(Report {
            text: render_error(error, output)?,
            succeeded: false,
        }),
    }
}

pub fn render_identity(
    information: &UserInformation,
    output: OutputFormat,
    show_claims: bool,
) -> Result<String, InspectError> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(information)?),
        OutputFormat::Summary => Ok(render_summary(information, show_claims)),
    }
}

pub fn render_error(error: &IdentityError, output: OutputFormat) -> Result<String, InspectError> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ErrorReport {
            error: error.kind(),
            message: error.message(),
        })?),
        OutputFormat::Summary => Ok(format!("error[{}]: {}", error.kind(), error.message())),
    }
}

fn labelled(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<LABEL_WIDTH$}{value}", format!("{label}:"))
}

fn render_summary(information: &UserInformation, show_claims: bool) -> String {
    let mut lines = vec![
        labelled("user id", information.user_id()),
        labelled("displayable", information.user_id_displayable()),
    ];

    let fields = [
        ("given name", information.given_name()),
        ("family name", information.family_name()),
        ("identity provider", information.identity_provider()),
        ("email", information.email()),
        ("unique name", information.unique_name()),
        ("upn", information.upn()),
        ("tenant id", information.tenant_id()),
        ("subject", information.subject()),
        ("object id", information.user_object_id()),
        ("guest id", information.guest_id()),
    ];
    lines.extend(
        fields
            .into_iter()
            .filter_map(|(label, value)| value.map(|value| labelled(label, value))),
    );

    if show_claims && let Some(claims) = information.all_claims() {
        lines.push("claims:".to_owned());
        lines.extend(
            claims
                .iter()
                .map(|(name, value)| format!("  {name} = {}", value.unwrap_or("null"))),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use idkit_core::IdentityError;
    use idkit_domain::UserInformation;

    use super::{render_error, render_identity, render_outcome};
    use crate::InspectError;
    use crate::inspect_config::OutputFormat;

    #[test]
    fn summary_lists_present_fields_only() -> Result<(), InspectError> {
        let information = UserInformation::from_user_id("Jane@Contoso.com")?;
        let summary = render_identity(&information, OutputFormat::Summary, true)?;

        assert!(summary.contains("user id:           jane@contoso.com"));
        assert!(summary.contains("displayable:       true"));
        assert!(!summary.contains("given name"));
        assert!(!summary.contains("claims:"));
        Ok(())
    }

    #[test]
    fn json_output_is_the_persisted_form() -> Result<(), InspectError> {
        let information = UserInformation::from_user_id("jane@contoso.com")?;
        let rendered = render_identity(&information, OutputFormat::Json, false)?;

        assert_eq!(UserInformation::from_json(rendered.as_str())?, information);
        Ok(())
    }

    #[test]
    fn errors_render_with_their_kind() -> Result<(), InspectError> {
        let error = IdentityError::EmptyUserId("user id must not be empty".to_owned());

        assert_eq!(
            render_error(&error, OutputFormat::Summary)?,
            "error[empty_user_id]: user id must not be empty"
        );
        let json: serde_json::Value =
            serde_json::from_str(render_error(&error, OutputFormat::Json)?.as_str())?;
        assert_eq!(json["error"], "empty_user_id");
        Ok(())
    }

    #[test]
    fn failed_resolution_is_reported_once_without_success() -> Result<(), InspectError> {
        let resolved = UserInformation::from_id_token("not.a.validpayload");
        let report = render_outcome(&resolved, OutputFormat::Summary, false)?;

        assert!(!report.succeeded);
        assert!(report.text.starts_with("error[malformed_token]: "));
        assert_eq!(report.text.lines().count(), 1);
        Ok(())
    }

    #[test]
    fn successful_resolution_renders_identity() -> Result<(), InspectError> {
        let resolved = UserInformation::from_user_id("Jane@Contoso.com");
        let report = render_outcome(&resolved, OutputFormat::Summary, false)?;

        assert!(report.succeeded);
        assert_eq!(
            report.text,
            "user id:           jane@contoso.com\ndisplayable:       true"
        );
        Ok(())
    }
}
