//! Seller stores and their delivery-person rosters

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TimeOfDay;

/// A seller's store
///
/// Owned by exactly one seller account; slots and offers hang off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    /// e.g. "Mon,Tue,Wed,Thu,Fri"
    pub working_days: String,
    pub opening_time: TimeOfDay,
    pub closing_time: TimeOfDay,
    /// GST rate applied to order subtotals; zero when not configured
    pub gst_percentage: Decimal,
    pub delivery_persons: Vec<DeliveryPerson>,
}

/// A roster entry used to staff deliveries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPerson {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

impl DeliveryPerson {
    /// Snapshot string recorded on orders, e.g. "Ravi (9876543210)"
    ///
    /// Orders keep this formatted copy rather than a live roster reference
    /// so later roster edits never rewrite history.
    pub fn contact_snapshot(&self) -> String {
        format!("{} ({})", self.name, self.phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_snapshot_format() {
        let person = DeliveryPerson {
            id: Uuid::nil(),
            name: "Ravi Kumar".to_string(),
            phone: "9876543210".to_string(),
        };
        assert_eq!(person.contact_snapshot(), "Ravi Kumar (9876543210)");
    }
}
