//! Portal wire models: invites, revocation, and the customer dashboard.

use crate::db::models::invoices::CustomerInvoiceSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Grant portal access to a customer or technician.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalInviteRequest {
    /// Email for the portal identity; defaults to the profile's email when
    /// omitted.
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalInviteResponse {
    pub email: String,
    /// Present only when a fresh identity was created for this invite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_password: Option<String>,
}

/// Aggregate figures for the customer dashboard. Zeroed when the customer has
/// no history at all.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDashboardResponse {
    pub upcoming_jobs: i64,
    pub open_invoices: i64,
    pub outstanding_cents: i64,
    pub paid_cents: i64,
    pub pending_estimates: i64,
}

impl CustomerDashboardResponse {
    pub fn new(upcoming_jobs: i64, pending_estimates: i64, summary: CustomerInvoiceSummary) -> Self {
        Self {
            upcoming_jobs,
            open_invoices: summary.open_invoices,
            outstanding_cents: summary.outstanding_cents,
            paid_cents: summary.paid_cents,
            pending_estimates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_zeroes_serialize() {
        let dashboard = CustomerDashboardResponse::new(0, 0, CustomerInvoiceSummary::default());
        let body = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "upcomingJobs": 0,
                "openInvoices": 0,
                "outstandingCents": 0,
                "paidCents": 0,
                "pendingEstimates": 0,
            })
        );
    }
}
