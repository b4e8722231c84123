//! Error classification for mutating calls
//!
//! Maps raw transport failures onto the closed taxonomy the dialogs and
//! alert banners render from. Total and side-effect-free: every input
//! maps to a value, including malformed failures.

use crate::error::Error;

/// Machine code for a create rejected over a duplicate instance name
const CODE_DUPLICATE_NAME: &str = "streams-mgmt-36";
/// Machine code for an exhausted streaming quota
const CODE_QUOTA_EXCEEDED: &str = "streams-mgmt-120";
/// Machine code for the per-organization instance ceiling
const CODE_MAX_INSTANCES: &str = "streams-mgmt-24";
/// Machine code for a plan the target region does not offer
const CODE_UNSUPPORTED_PLAN: &str = "streams-mgmt-21";
/// Machine code for an unauthorized principal
const CODE_UNAUTHORIZED: &str = "streams-mgmt-11";

/// Closed taxonomy of user-facing failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An instance with the requested name already exists
    DuplicateName,
    /// The organization's streaming quota is exhausted
    QuotaExceeded,
    /// The organization already runs the maximum number of instances
    MaxInstancesReached,
    /// The selected plan is not available for the selection
    UnsupportedPlan,
    /// The caller is not permitted to perform the action
    Unauthorized,
    /// Anything the console cannot interpret
    Unknown,
}

impl ErrorKind {
    /// Remedy message shown alongside the failure.
    pub fn remedy(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateName => "Choose a different instance name and try again.",
            ErrorKind::QuotaExceeded => "Your streaming quota is used up. Delete an instance or request more quota.",
            ErrorKind::MaxInstancesReached => "Your organization has reached its instance limit.",
            ErrorKind::UnsupportedPlan => "The selected plan is not available for this provider and region.",
            ErrorKind::Unauthorized => "You do not have permission for this action. Contact your organization administrator.",
            ErrorKind::Unknown => "Something went wrong. Try again, and contact support if the problem persists.",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::DuplicateName => "duplicate name",
            ErrorKind::QuotaExceeded => "quota exceeded",
            ErrorKind::MaxInstancesReached => "instance limit reached",
            ErrorKind::UnsupportedPlan => "unsupported plan",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}

/// Classify a transport failure into the closed taxonomy.
///
/// Known machine codes win; a 401/403 without a recognizable code still
/// classifies as `Unauthorized`; everything else is `Unknown`.
pub fn classify(error: &Error) -> ErrorKind {
    let Error::Api { status, body } = error else {
        return ErrorKind::Unknown;
    };

    if let Some(code) = body.code.as_deref() {
        match code.to_ascii_lowercase().as_str() {
            CODE_DUPLICATE_NAME => return ErrorKind::DuplicateName,
            CODE_QUOTA_EXCEEDED => return ErrorKind::QuotaExceeded,
            CODE_MAX_INSTANCES => return ErrorKind::MaxInstancesReached,
            CODE_UNSUPPORTED_PLAN => return ErrorKind::UnsupportedPlan,
            CODE_UNAUTHORIZED => return ErrorKind::Unauthorized,
            _ => {}
        }
    }

    match status {
        401 | 403 => ErrorKind::Unauthorized,
        _ => ErrorKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, body: &str) -> Error {
        Error::api(status, body)
    }

    #[test]
    fn test_known_codes() {
        let cases = [
            (CODE_DUPLICATE_NAME, ErrorKind::DuplicateName),
            (CODE_QUOTA_EXCEEDED, ErrorKind::QuotaExceeded),
            (CODE_MAX_INSTANCES, ErrorKind::MaxInstancesReached),
            (CODE_UNSUPPORTED_PLAN, ErrorKind::UnsupportedPlan),
            (CODE_UNAUTHORIZED, ErrorKind::Unauthorized),
        ];
        for (code, expected) in cases {
            let err = api_error(400, &format!(r#"{{"code":"{}"}}"#, code));
            assert_eq!(classify(&err), expected, "code {}", code);
        }
    }

    #[test]
    fn test_code_match_is_case_insensitive() {
        let err = api_error(409, r#"{"code":"STREAMS-MGMT-36"}"#);
        assert_eq!(classify(&err), ErrorKind::DuplicateName);
    }

    #[test]
    fn test_status_fallback_for_auth() {
        assert_eq!(classify(&api_error(401, "")), ErrorKind::Unauthorized);
        assert_eq!(classify(&api_error(403, "{}")), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_unknown_fallbacks() {
        // Unrecognized code
        assert_eq!(
            classify(&api_error(400, r#"{"code":"streams-mgmt-999"}"#)),
            ErrorKind::Unknown
        );
        // Malformed body
        assert_eq!(classify(&api_error(500, "<html>oops</html>")), ErrorKind::Unknown);
        // Non-API failures
        assert_eq!(
            classify(&Error::Connection("refused".to_string())),
            ErrorKind::Unknown
        );
        assert_eq!(
            classify(&Error::Timeout("30s elapsed".to_string())),
            ErrorKind::Unknown
        );
    }
}
