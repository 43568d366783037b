//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UserProfileCommand, UserReconciliationCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub profile: Arc<dyn UserProfileCommand>,
    pub reconciliation: Arc<dyn UserReconciliationCommand>,
}

impl HttpState {
    /// Construct state from the two driving ports.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(Arc::new(profile_service), Arc::new(reconciliation_service));
    /// ```
    pub fn new(
        profile: Arc<dyn UserProfileCommand>,
        reconciliation: Arc<dyn UserReconciliationCommand>,
    ) -> Self {
        Self {
            profile,
            reconciliation,
        }
    }
}
