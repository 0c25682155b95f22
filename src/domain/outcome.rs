/// Business-rule failures that carry a fixed user-facing message.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rejection {
    UnknownAccount,
    WrongAmount,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Self::UnknownAccount => "Account No is not recognized.",
            Self::WrongAmount => "Wrong amount.",
        }
    }
}

/// Failures that are swallowed without a message. The caller sees the same
/// `(false, no error)` shape for all of them; the distinction exists for
/// logging and tests.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IgnoreReason {
    MalformedInput,
    UnknownPaymentMethod,
    DuplicateTransaction,
}

/// The orchestrator's single result type. Silent failures and message-bearing
/// rejections are deliberately distinct variants.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// The event passed every check. `persisted` is true only for
    /// confirmations; validations succeed without side effects.
    Accepted { persisted: bool },
    Rejected(Rejection),
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The fixed message for business-rule rejections, `None` for everything
    /// else (the `error == false` half of the contract).
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Rejected(rejection) => Some(rejection.message()),
            _ => None,
        }
    }
}
