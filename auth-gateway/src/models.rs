use auth_identity::Identity;

/// Result of a credential check that passed.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Session established; the caller is signed in.
    Authenticated(Identity),
    /// Credentials matched but the account requires a second factor.
    /// The caller must follow up with `verify_challenge`.
    ChallengeRequired,
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }
}
