//! Set reconciliation for provider-observed relations.
//!
//! Given the values persisted for a relation and the values the identity
//! provider observed in this cycle, [`plan_relation`] decides which writes
//! bring the relation up to date. Reconciliation is additive: a non-empty
//! observation only ever inserts the missing values.
//!
//! An empty observation is ambiguous. The provider may genuinely report zero
//! items, or a non-success response may have collapsed into "no data". The
//! [`EmptyObservationPolicy`] makes the choice explicit instead of leaving it
//! implicit in the call sites.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// What to do with a persisted relation when the provider observed nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyObservationPolicy {
    /// Delete every persisted row of the relation.
    #[default]
    ClearRelation,
    /// Leave the persisted rows untouched.
    RetainExisting,
}

/// Error raised when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown empty observation policy `{0}`; expected `clear` or `retain`")]
pub struct UnknownPolicyError(pub String);

impl FromStr for EmptyObservationPolicy {
    type Err = UnknownPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" | "clear_relation" => Ok(Self::ClearRelation),
            "retain" | "retain_existing" => Ok(Self::RetainExisting),
            other => Err(UnknownPolicyError(other.to_owned())),
        }
    }
}

impl fmt::Display for EmptyObservationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClearRelation => f.write_str("clear"),
            Self::RetainExisting => f.write_str("retain"),
        }
    }
}

/// Writes required to reconcile one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationPlan {
    /// Delete all persisted rows.
    Clear,
    /// Nothing to write.
    Retain,
    /// Insert these values, in observed order.
    Insert(Vec<String>),
}

impl RelationPlan {
    /// Number of rows this plan inserts.
    pub fn insert_count(&self) -> usize {
        match self {
            Self::Insert(values) => values.len(),
            Self::Clear | Self::Retain => 0,
        }
    }

    /// Whether applying the plan changes nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Retain => true,
            Self::Insert(values) => values.is_empty(),
            Self::Clear => false,
        }
    }
}

/// Compute the writes that reconcile `existing` against `observed`.
///
/// Persisted `None` entries compare as the empty string, so they never
/// satisfy membership for a non-empty observed value. A value repeated
/// within `observed` is inserted once.
///
/// # Examples
/// ```
/// use user_service::domain::reconciler::{plan_relation, EmptyObservationPolicy, RelationPlan};
///
/// let observed = vec!["bob".to_owned(), "carol".to_owned()];
/// let existing = vec![Some("bob".to_owned()), None];
/// let plan = plan_relation(&observed, &existing, EmptyObservationPolicy::ClearRelation);
/// assert_eq!(plan, RelationPlan::Insert(vec!["carol".to_owned()]));
/// ```
pub fn plan_relation(
    observed: &[String],
    existing: &[Option<String>],
    policy: EmptyObservationPolicy,
) -> RelationPlan {
    if observed.is_empty() {
        return match policy {
            EmptyObservationPolicy::ClearRelation => RelationPlan::Clear,
            EmptyObservationPolicy::RetainExisting => RelationPlan::Retain,
        };
    }

    let mut present: HashSet<&str> = existing
        .iter()
        .map(|entry| entry.as_deref().unwrap_or(""))
        .collect();

    let mut inserts = Vec::new();
    for value in observed {
        if present.insert(value.as_str()) {
            inserts.push(value.clone());
        }
    }

    RelationPlan::Insert(inserts)
}
