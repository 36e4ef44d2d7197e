// src/roster/types.rs
use serde::Deserialize;
use serde_json::Value;

/// Why the roster service refused an email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Email was already consumed by an earlier verification
    AlreadyUsed,
    /// Email is on the roster but its status is not OK
    StatusNotOk,
    /// Email is not on the roster
    NotFound,
    /// Anything else, including transport and parse failures
    Error,
}

impl RejectReason {
    pub fn from_code(code: &str) -> Self {
        match code {
            "ja_usado" => RejectReason::AlreadyUsed,
            "status_nao_ok" => RejectReason::StatusNotOk,
            "not_found" => RejectReason::NotFound,
            _ => RejectReason::Error,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::AlreadyUsed => "ja_usado",
            RejectReason::StatusNotOk => "status_nao_ok",
            RejectReason::NotFound => "not_found",
            RejectReason::Error => "erro",
        }
    }
}

/// Outcome of a single roster lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationResult {
    pub authorized: bool,
    pub reason: RejectReason,
}

impl VerificationResult {
    pub fn authorized() -> Self {
        Self {
            authorized: true,
            reason: RejectReason::Error,
        }
    }

    pub fn rejected(reason: RejectReason) -> Self {
        Self {
            authorized: false,
            reason,
        }
    }

    /// Generic failure used for every local error
    pub fn failed() -> Self {
        Self::rejected(RejectReason::Error)
    }
}

/// JSON body returned by the roster service.
///
/// Fields are kept loose so that a wrongly typed value rejects the email
/// instead of failing the whole parse.
#[derive(Debug, Deserialize)]
pub struct RosterResponse {
    #[serde(default)]
    pub autorizado: Option<Value>,
    #[serde(default)]
    pub reason: Option<Value>,
}

impl RosterResponse {
    pub fn into_result(self) -> VerificationResult {
        if matches!(self.autorizado, Some(Value::Bool(true))) {
            return VerificationResult::authorized();
        }

        let code = self
            .reason
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("erro");

        VerificationResult::rejected(RejectReason::from_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> VerificationResult {
        serde_json::from_str::<RosterResponse>(json)
            .unwrap()
            .into_result()
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(RejectReason::from_code("ja_usado"), RejectReason::AlreadyUsed);
        assert_eq!(RejectReason::from_code("status_nao_ok"), RejectReason::StatusNotOk);
        assert_eq!(RejectReason::from_code("not_found"), RejectReason::NotFound);
        assert_eq!(RejectReason::from_code("erro"), RejectReason::Error);
        assert_eq!(RejectReason::from_code("something_new"), RejectReason::Error);
        assert_eq!(RejectReason::from_code("NOT_FOUND"), RejectReason::Error);
    }

    #[test]
    fn test_authorized_response() {
        let result = parse(r#"{"autorizado": true}"#);
        assert!(result.authorized);
    }

    #[test]
    fn test_authorized_ignores_reason() {
        let result = parse(r#"{"autorizado": true, "reason": "ja_usado"}"#);
        assert!(result.authorized);
    }

    #[test]
    fn test_rejected_with_reason() {
        let result = parse(r#"{"autorizado": false, "reason": "not_found"}"#);
        assert_eq!(result, VerificationResult::rejected(RejectReason::NotFound));
    }

    #[test]
    fn test_missing_or_empty_reason_is_error() {
        assert_eq!(parse(r#"{"autorizado": false}"#), VerificationResult::failed());
        assert_eq!(
            parse(r#"{"autorizado": false, "reason": ""}"#),
            VerificationResult::failed()
        );
        assert_eq!(
            parse(r#"{"autorizado": false, "reason": 42}"#),
            VerificationResult::failed()
        );
    }

    #[test]
    fn test_only_boolean_true_authorizes() {
        assert!(!parse(r#"{"autorizado": "true", "reason": "ja_usado"}"#).authorized);
        assert!(!parse(r#"{"autorizado": 1}"#).authorized);
        assert!(!parse(r#"{}"#).authorized);
    }
}
