//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases for readability at call
//! sites. [`CompanyId`] is the tenant identifier: every owned entity carries
//! one, and every data-access call takes one explicitly.

use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type CompanyId = Uuid;
pub type CustomerId = Uuid;
pub type TechnicianId = Uuid;
pub type CrewId = Uuid;
pub type JobId = Uuid;
pub type EstimateId = Uuid;
pub type InvoiceId = Uuid;
pub type ConsultationId = Uuid;
pub type ApiKeyId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let uuid: Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(abbrev_uuid(&uuid), "550e8400");
    }
}
