use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How bookings for a tenant resolve a contested provider/timestamp pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantPolicy {
    /// One patient per provider and timestamp; a taken slot is rejected.
    Strict,
    /// Shared clinic quota; overbooking is allowed and load is balanced.
    Pooled,
}

impl fmt::Display for TenantPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantPolicy::Strict => write!(f, "strict"),
            TenantPolicy::Pooled => write!(f, "pooled"),
        }
    }
}

impl FromStr for TenantPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TenantPolicy::Strict),
            "pooled" => Ok(TenantPolicy::Pooled),
            other => Err(format!("unknown tenant policy '{}'", other)),
        }
    }
}

/// Policy lookup keyed by tenant code. Codes are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPolicyTable {
    policies: HashMap<String, TenantPolicy>,
    default_policy: TenantPolicy,
}

impl Default for TenantPolicyTable {
    fn default() -> Self {
        Self::new(TenantPolicy::Strict)
    }
}

impl TenantPolicyTable {
    pub fn new(default_policy: TenantPolicy) -> Self {
        Self {
            policies: HashMap::new(),
            default_policy,
        }
    }

    /// Parses `CODE=policy` pairs separated by commas, e.g. `POOL1=pooled,ACME=strict`.
    /// Malformed entries are skipped.
    pub fn parse(raw: &str, default_policy: TenantPolicy) -> Self {
        let mut table = Self::new(default_policy);

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((code, policy)) = entry.split_once('=') else {
                warn!("Ignoring tenant policy entry without '=': {}", entry);
                continue;
            };

            match policy.parse::<TenantPolicy>() {
                Ok(policy) if !code.trim().is_empty() => {
                    table.insert(code, policy);
                }
                Ok(_) => warn!("Ignoring tenant policy entry with empty code: {}", entry),
                Err(e) => warn!("Ignoring tenant policy entry '{}': {}", entry, e),
            }
        }

        table
    }

    pub fn with_tenant(mut self, code: &str, policy: TenantPolicy) -> Self {
        self.insert(code, policy);
        self
    }

    pub fn insert(&mut self, code: &str, policy: TenantPolicy) {
        self.policies.insert(normalize(code), policy);
    }

    pub fn policy_for(&self, tenant: &str) -> TenantPolicy {
        self.policies
            .get(&normalize(tenant))
            .copied()
            .unwrap_or(self.default_policy)
    }

    pub fn default_policy(&self) -> TenantPolicy {
        self.default_policy
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tenants() {
        let table = TenantPolicyTable::parse("POOL1=pooled, acme=Strict", TenantPolicy::Strict);

        assert_eq!(table.len(), 2);
        assert_eq!(table.policy_for("POOL1"), TenantPolicy::Pooled);
        assert_eq!(table.policy_for("pool1"), TenantPolicy::Pooled);
        assert_eq!(table.policy_for("ACME"), TenantPolicy::Strict);
    }

    #[test]
    fn test_unknown_tenant_uses_default() {
        let table = TenantPolicyTable::parse("POOL1=pooled", TenantPolicy::Strict);
        assert_eq!(table.policy_for("NEWCO"), TenantPolicy::Strict);

        let pooled_default = TenantPolicyTable::new(TenantPolicy::Pooled);
        assert_eq!(pooled_default.policy_for("NEWCO"), TenantPolicy::Pooled);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let table = TenantPolicyTable::parse("POOL1, =pooled,BAD=sometimes,OK=pooled", TenantPolicy::Strict);

        assert_eq!(table.len(), 1);
        assert_eq!(table.policy_for("OK"), TenantPolicy::Pooled);
        assert_eq!(table.policy_for("BAD"), TenantPolicy::Strict);
    }

    #[test]
    fn test_empty_input() {
        let table = TenantPolicyTable::parse("", TenantPolicy::Strict);
        assert!(table.is_empty());
    }
}
