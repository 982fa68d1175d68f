// ABOUTME: Error types for cPanel UAPI calls.
// ABOUTME: Distinguishes transport failures from `status: 0` envelope failures.

use crate::http::HttpError;

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The call reached cPanel but the envelope reported `status: 0`.
    #[error("{module}/{function} was unsuccessful{}", format_errors(.errors))]
    ApiLogical {
        module: &'static str,
        function: &'static str,
        errors: Vec<String>,
    },

    #[error("{module}/{function} returned an unexpected payload: {source}")]
    Envelope {
        module: &'static str,
        function: &'static str,
        source: serde_json::Error,
    },
}

fn format_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(": {}", errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_error_lists_remote_messages() {
        let err = TargetError::ApiLogical {
            module: "VersionControl",
            function: "update",
            errors: vec!["The repository has uncommitted changes.".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "VersionControl/update was unsuccessful: The repository has uncommitted changes."
        );
    }

    #[test]
    fn logical_error_without_messages() {
        let err = TargetError::ApiLogical {
            module: "VCDeployStatus",
            function: "retrieve",
            errors: Vec::new(),
        };
        assert_eq!(err.to_string(), "VCDeployStatus/retrieve was unsuccessful");
    }
}
