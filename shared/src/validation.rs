//! Validation utilities for the Grocto marketplace
//!
//! Includes India-specific validations matching the platform's single
//! INR/IST convention.

use rust_decimal::Decimal;

use crate::models::{Discount, Offer};
use crate::types::TimeOfDay;

// ============================================================================
// Marketplace Validations
// ============================================================================

/// Validate a delivery slot window (start strictly before end)
pub fn validate_slot_window(start: TimeOfDay, end: TimeOfDay) -> Result<(), &'static str> {
    if start >= end {
        return Err("Slot start time must be before end time");
    }
    Ok(())
}

/// Validate a delivery fee is non-negative
pub fn validate_delivery_fee(fee: Decimal) -> Result<(), &'static str> {
    if fee < Decimal::ZERO {
        return Err("Delivery fee cannot be negative");
    }
    Ok(())
}

/// Validate a GST percentage (0-100)
pub fn validate_gst_percentage(gst: Decimal) -> Result<(), &'static str> {
    if gst < Decimal::ZERO || gst > Decimal::ONE_HUNDRED {
        return Err("GST percentage must be between 0 and 100");
    }
    Ok(())
}

/// Validate an offer's discount, dates, and limits
pub fn validate_offer_fields(offer: &Offer) -> Result<(), &'static str> {
    match offer.discount {
        Discount::Percentage { amount } => {
            if amount <= Decimal::ZERO || amount > Decimal::ONE_HUNDRED {
                return Err("Percentage discount must be between 0 and 100");
            }
        }
        Discount::Fixed { amount } => {
            if amount <= Decimal::ZERO {
                return Err("Fixed discount must be positive");
            }
        }
    }
    if offer.min_purchase < Decimal::ZERO {
        return Err("Minimum purchase cannot be negative");
    }
    if offer.closing_date < offer.starting_date {
        return Err("Offer closing date must not be before its starting date");
    }
    Ok(())
}

/// Validate a cart quantity
pub fn validate_quantity(quantity: u32) -> Result<(), &'static str> {
    if quantity == 0 {
        return Err("Quantity must be at least 1");
    }
    Ok(())
}

/// Validate a product price
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be positive");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Validate an Indian mobile number
/// Accepts: 9876543210, 98765-43210, +919876543210, 09876543210
pub fn validate_indian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Standard mobile: 10 digits starting with 6-9
    if digits.len() == 10 && digits.starts_with(['6', '7', '8', '9']) {
        return Ok(());
    }
    // With trunk prefix: 11 digits starting with 0
    if digits.len() == 11 && digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: 12 digits starting with 91
    if digits.len() == 12 && digits.starts_with("91") {
        return Ok(());
    }

    Err("Invalid Indian phone number format")
}

/// Validate a college id (3-20 alphanumeric, dashes allowed)
pub fn validate_college_id(id: &str) -> Result<(), &'static str> {
    if id.len() < 3 {
        return Err("College ID must be at least 3 characters");
    }
    if id.len() > 20 {
        return Err("College ID must be at most 20 characters");
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err("College ID must be alphanumeric");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OfferScope;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn offer_with(discount: Discount) -> Offer {
        Offer {
            id: Uuid::nil(),
            store_id: Uuid::nil(),
            title: "Test".to_string(),
            description: None,
            discount,
            min_purchase: Decimal::ZERO,
            scope: OfferScope::All,
            offer_limit: 0,
            usage_count: 0,
            starting_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            closing_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            created_at: Utc::now(),
        }
    }

    // ========================================================================
    // Marketplace Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_slot_window() {
        assert!(validate_slot_window(t("09:00"), t("12:00")).is_ok());
        assert!(validate_slot_window(t("12:00"), t("09:00")).is_err());
        assert!(validate_slot_window(t("09:00"), t("09:00")).is_err());
    }

    #[test]
    fn test_validate_delivery_fee() {
        assert!(validate_delivery_fee(Decimal::ZERO).is_ok());
        assert!(validate_delivery_fee(dec("25.50")).is_ok());
        assert!(validate_delivery_fee(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_gst_percentage() {
        assert!(validate_gst_percentage(Decimal::ZERO).is_ok());
        assert!(validate_gst_percentage(dec("5")).is_ok());
        assert!(validate_gst_percentage(dec("100")).is_ok());
        assert!(validate_gst_percentage(dec("101")).is_err());
        assert!(validate_gst_percentage(dec("-5")).is_err());
    }

    #[test]
    fn test_validate_offer_percentage_bounds() {
        assert!(validate_offer_fields(&offer_with(Discount::Percentage { amount: dec("10") }))
            .is_ok());
        assert!(validate_offer_fields(&offer_with(Discount::Percentage { amount: dec("100") }))
            .is_ok());
        assert!(validate_offer_fields(&offer_with(Discount::Percentage { amount: dec("101") }))
            .is_err());
        assert!(validate_offer_fields(&offer_with(Discount::Percentage { amount: Decimal::ZERO }))
            .is_err());
    }

    #[test]
    fn test_validate_offer_fixed_positive() {
        assert!(validate_offer_fields(&offer_with(Discount::Fixed { amount: dec("50") })).is_ok());
        assert!(validate_offer_fields(&offer_with(Discount::Fixed { amount: Decimal::ZERO }))
            .is_err());
    }

    #[test]
    fn test_validate_offer_dates() {
        let mut offer = offer_with(Discount::Fixed { amount: dec("50") });
        offer.closing_date = offer.starting_date.pred_opt().unwrap();
        assert!(validate_offer_fields(&offer).is_err());

        offer.closing_date = offer.starting_date;
        assert!(validate_offer_fields(&offer).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(dec("10.00")).is_ok());
        assert!(validate_price(Decimal::ZERO).is_err());
        assert!(validate_price(dec("-10")).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@college.ac.in").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("short").is_err());
    }

    // ========================================================================
    // India-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_indian_phone_valid() {
        // Standard mobile
        assert!(validate_indian_phone("9876543210").is_ok());
        // With dashes
        assert!(validate_indian_phone("98765-43210").is_ok());
        // Trunk prefix
        assert!(validate_indian_phone("09876543210").is_ok());
        // International format
        assert!(validate_indian_phone("+919876543210").is_ok());
        assert!(validate_indian_phone("919876543210").is_ok());
    }

    #[test]
    fn test_validate_indian_phone_invalid() {
        assert!(validate_indian_phone("12345").is_err());
        // Landline-style leading digit
        assert!(validate_indian_phone("1234567890").is_err());
        assert!(validate_indian_phone("abcdefghij").is_err());
    }

    #[test]
    fn test_validate_college_id() {
        assert!(validate_college_id("CS2021").is_ok());
        assert!(validate_college_id("2021-CSE-042").is_ok());
        assert!(validate_college_id("AB").is_err()); // Too short
        assert!(validate_college_id("A-very-long-college-id-x").is_err()); // Too long
        assert!(validate_college_id("CS 2021").is_err()); // Space
    }
}
