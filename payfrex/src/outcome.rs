//! Transaction outcome resolution.
//!
//! Everything here is a pure read of an already normalized [`Notification`].
//! Only the last operation counts: earlier operations are audit steps of the
//! same asynchronous flow.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::notification::Notification;

/// Prefix the gateway puts in front of redirect targets.
pub const REDIRECT_PREFIX: &str = "redirect:";

/// Terminal or intermediate outcome of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionOutcome {
    /// The payment completed.
    Success,
    /// The payment awaits further asynchronous steps.
    Pending,
    /// The customer must be redirected, e.g. to a 3-D Secure challenge.
    Redirected,
    /// The gateway reported an error, or the status was not recognized.
    Error,
    /// The payment was declined.
    Fail,
}

impl TransactionOutcome {
    /// Matches a gateway status string exactly (case-sensitive).
    #[must_use]
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "SUCCESS" => Some(Self::Success),
            "PENDING" => Some(Self::Pending),
            "REDIRECTED" => Some(Self::Redirected),
            "ERROR" => Some(Self::Error),
            "FAIL" => Some(Self::Fail),
            _ => None,
        }
    }

    /// Returns the gateway status name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Pending => "PENDING",
            Self::Redirected => "REDIRECTED",
            Self::Error => "ERROR",
            Self::Fail => "FAIL",
        }
    }
}

impl Display for TransactionOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Notification {
    /// Resolves the outcome from the last operation's status.
    ///
    /// Unknown statuses, a missing status and an empty operation list all
    /// resolve to [`TransactionOutcome::Error`].
    #[must_use]
    pub fn outcome(&self) -> TransactionOutcome {
        let outcome = self
            .last_operation()
            .and_then(|op| op.status.as_deref())
            .and_then(TransactionOutcome::from_status)
            .unwrap_or(TransactionOutcome::Error);

        #[cfg(feature = "telemetry")]
        tracing::trace!(%outcome, "Resolved transaction outcome");

        outcome
    }

    /// Returns `true` once no further notifications are expected for this
    /// transaction: the last status is `SUCCESS` or `ERROR`, ignoring case.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.last_operation()
            .and_then(|op| op.status.as_deref())
            .is_some_and(|status| {
                status.eq_ignore_ascii_case("SUCCESS") || status.eq_ignore_ascii_case("ERROR")
            })
    }

    /// Returns the last operation's redirect target without the `redirect:`
    /// prefix.
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        self.last_operation()
            .and_then(|op| op.redirection_response.as_deref())
            .map(|target| target.strip_prefix(REDIRECT_PREFIX).unwrap_or(target))
    }

    /// Returns the last operation's merchant transaction id.
    #[must_use]
    pub fn merchant_transaction_id(&self) -> Option<&str> {
        self.last_operation()
            .and_then(|op| op.merchant_transaction_id.as_deref())
    }
}

/// Everything a caller needs after a gateway round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    /// Resolved outcome.
    pub outcome: TransactionOutcome,
    /// Whether the flow is finished.
    pub terminal: bool,
    /// Where to send the customer next, if anywhere.
    pub redirect_url: Option<String>,
    /// Merchant-side transaction identifier.
    pub merchant_transaction_id: Option<String>,
    /// The normalized notification.
    pub notification: Notification,
}

impl From<Notification> for TransactionResult {
    fn from(notification: Notification) -> Self {
        Self {
            outcome: notification.outcome(),
            terminal: notification.is_terminal(),
            redirect_url: notification.redirect_url().map(str::to_owned),
            merchant_transaction_id: notification.merchant_transaction_id().map(str::to_owned),
            notification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{Operation, parse_str};

    fn with_last(status: &str) -> Notification {
        Notification {
            operations: vec![
                Operation {
                    status: Some("SUCCESS".into()),
                    ..Operation::default()
                },
                Operation {
                    status: Some(status.into()),
                    ..Operation::default()
                },
            ],
            ..Notification::default()
        }
    }

    #[test]
    fn test_outcome_uses_last_operation() {
        assert_eq!(with_last("PENDING").outcome(), TransactionOutcome::Pending);
        assert_eq!(with_last("FAIL").outcome(), TransactionOutcome::Fail);
        assert_eq!(
            with_last("REDIRECTED").outcome(),
            TransactionOutcome::Redirected
        );
    }

    #[test]
    fn test_unknown_status_resolves_to_error() {
        assert_eq!(
            with_last("WEIRD_UNKNOWN").outcome(),
            TransactionOutcome::Error
        );
        assert_eq!(with_last("success").outcome(), TransactionOutcome::Error);
        assert_eq!(Notification::default().outcome(), TransactionOutcome::Error);
    }

    #[test]
    fn test_terminal_detection() {
        assert!(with_last("SUCCESS").is_terminal());
        assert!(with_last("error").is_terminal());
        assert!(with_last("Success").is_terminal());
        assert!(!with_last("PENDING").is_terminal());
        assert!(!with_last("REDIRECTED").is_terminal());
        assert!(!with_last("FAIL").is_terminal());
        assert!(!Notification::default().is_terminal());
    }

    #[test]
    fn test_redirect_prefix_is_stripped() {
        let mut notification = with_last("REDIRECTED");
        notification.operations[1].redirection_response = Some("redirect:https://x/y".into());
        assert_eq!(notification.redirect_url(), Some("https://x/y"));

        notification.operations[1].redirection_response = Some("https://x/z".into());
        assert_eq!(notification.redirect_url(), Some("https://x/z"));

        notification.operations[1].redirection_response = None;
        assert_eq!(notification.redirect_url(), None);
    }

    #[test]
    fn test_redirect_reads_only_last_operation() {
        let mut notification = with_last("SUCCESS");
        notification.operations[0].redirection_response = Some("redirect:https://old".into());
        assert_eq!(notification.redirect_url(), None);
    }

    #[test]
    fn test_denied_three_step_flow() {
        let xml = "<response><status>ERROR</status><operations>\
            <operation><service>RISK</service><status>SUCCESS</status></operation>\
            <operation><service>3DSv2</service><status>SUCCESS3DS</status></operation>\
            <operation><service>DIRECT</service><status>ERROR</status>\
              <message>Denied by issuer</message>\
              <merchantTransactionId>TX-1</merchantTransactionId></operation>\
            </operations></response>";
        let result = TransactionResult::from(parse_str(xml).unwrap());

        assert_eq!(result.outcome, TransactionOutcome::Error);
        assert!(result.terminal);
        assert_eq!(result.merchant_transaction_id.as_deref(), Some("TX-1"));
        assert_eq!(result.redirect_url, None);

        let ops = &result.notification.operations;
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].service.as_deref(), Some("RISK"));
        assert_eq!(ops[1].service.as_deref(), Some("3DSv2"));
        assert_eq!(ops[2].message.as_deref(), Some("Denied by issuer"));
    }

    #[test]
    fn test_outcome_serializes_as_status_name() {
        assert_eq!(
            serde_json::to_string(&TransactionOutcome::Redirected).unwrap(),
            "\"REDIRECTED\""
        );
        assert_eq!(TransactionOutcome::Fail.to_string(), "FAIL");
    }
}
