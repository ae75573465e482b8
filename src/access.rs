use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::{Session, TokenVerifier},
    error::AuthError,
    policy::{AccessPolicy, Decision, Role},
};

/// DecisionReason
///
/// Which step of the procedure produced a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionReason {
    /// Login page requested without a credential.
    LoginPage,
    /// Login page requested while holding a credential, valid or not.
    AlreadySignedIn,
    /// No credential, or one that failed verification.
    Rejected(AuthError),
    /// A policy rule matched; carries the rule name.
    Rule(&'static str),
    /// Verified credential whose role no rule covers.
    NoRule,
}

/// Verdict
///
/// A decision plus the reason and, when the credential verified, the session it resolved.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub decision: Decision,
    pub reason: DecisionReason,
    pub session: Option<Session>,
}

impl Verdict {
    fn new(decision: Decision, reason: DecisionReason) -> Self {
        Self {
            decision,
            reason,
            session: None,
        }
    }

    /// True when a credential was presented but refused; the cookie holding it is stale.
    pub fn credential_rejected(&self) -> bool {
        match &self.reason {
            DecisionReason::Rejected(AuthError::MissingCredential) => false,
            DecisionReason::Rejected(_) | DecisionReason::NoRule => true,
            _ => false,
        }
    }
}

/// AccessGate
///
/// The per-request access decision. Holds only immutable state (policy table and
/// verifier), so one instance is shared across all requests without locking.
#[derive(Clone)]
pub struct AccessGate {
    policy: Arc<AccessPolicy>,
    verifier: Arc<TokenVerifier>,
}

impl AccessGate {
    pub fn new(policy: AccessPolicy, verifier: TokenVerifier) -> Self {
        Self {
            policy: Arc::new(policy),
            verifier: Arc::new(verifier),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Three-way decision for `path` against the wall clock.
    pub fn decide(&self, path: &str, credential: Option<&str>) -> Decision {
        self.evaluate(path, credential, Utc::now().timestamp()).decision
    }

    /// Same as `decide` with an explicit `now` (seconds since the epoch) for expiry.
    pub fn decide_at(&self, path: &str, credential: Option<&str>, now: i64) -> Decision {
        self.evaluate(path, credential, now).decision
    }

    /// evaluate
    ///
    /// Runs the full procedure:
    /// 1. Login page: bounce to the landing page if any credential is present.
    /// 2. No credential: login.
    /// 3. Credential fails signature or expiry: login, same as absent.
    /// 4. Role rules from the policy table, first match wins.
    /// 5. No rule for the role: login.
    pub fn evaluate(&self, path: &str, credential: Option<&str>, now: i64) -> Verdict {
        if self.policy.is_login_path(path) {
            return match credential {
                Some(_) => {
                    Verdict::new(Decision::RedirectToDefault, DecisionReason::AlreadySignedIn)
                }
                None => Verdict::new(Decision::Allow, DecisionReason::LoginPage),
            };
        }

        let Some(raw) = credential else {
            return Verdict::new(
                Decision::RedirectToLogin,
                DecisionReason::Rejected(AuthError::MissingCredential),
            );
        };

        let claims = match self.verifier.verify(raw, now) {
            Ok(claims) => claims,
            Err(err) => {
                return Verdict::new(Decision::RedirectToLogin, DecisionReason::Rejected(err));
            }
        };

        let session = Session::from(&claims);

        match self.policy.evaluate(&session.role, path) {
            Some(rule) => Verdict {
                decision: rule.then,
                reason: DecisionReason::Rule(rule.name),
                session: Some(session),
            },
            None => {
                let reason = match &session.role {
                    Role::Unrecognized(raw) => {
                        DecisionReason::Rejected(AuthError::UnrecognizedRole(raw.clone()))
                    }
                    _ => DecisionReason::NoRule,
                };
                Verdict::new(Decision::RedirectToLogin, reason)
            }
        }
    }
}
