//! Authorization policy.
//!
//! The original server leaves several state-changing operations open to any
//! caller (job upsert, bid status update) and checks only token presence on
//! job deletion. That behavior is preserved as the legacy default, but the
//! decision lives here rather than in the handlers so a stricter deployment
//! can flip it without touching repository logic.

use tracing::warn;

/// Authorization stance for the legacy open-mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPolicy {
    /// Match the original server: upsert and bid-status-update are open,
    /// delete requires only a valid claim.
    #[default]
    Legacy,
    /// Require a verified claim on every mutation, and owner matching where
    /// the resource carries an owner field.
    Strict,
}

impl AuthPolicy {
    /// Read from the `AUTH_POLICY` env var; unknown values fall back to legacy.
    pub fn from_env() -> Self {
        match std::env::var("AUTH_POLICY").as_deref() {
            Ok("strict") => Self::Strict,
            Ok(other) if other != "legacy" => {
                warn!("Unknown AUTH_POLICY '{}', using legacy", other);
                Self::Legacy
            }
            _ => Self::Legacy,
        }
    }

    /// Whether unowned mutation endpoints must still present a valid claim.
    pub fn requires_claim_for_mutations(&self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Whether delete must verify the claim against the resource owner.
    pub fn requires_owner_match(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_leaves_mutations_open() {
        let policy = AuthPolicy::Legacy;
        assert!(!policy.requires_claim_for_mutations());
        assert!(!policy.requires_owner_match());
    }

    #[test]
    fn strict_gates_everything() {
        let policy = AuthPolicy::Strict;
        assert!(policy.requires_claim_for_mutations());
        assert!(policy.requires_owner_match());
    }
}
