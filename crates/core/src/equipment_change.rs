//! Equipment change request constants and validation.
//!
//! An equipment change is a request to import stock into, or export stock
//! out of, a farm's equipment inventory. Requests are created `pending` and
//! transition exactly once to `approved` or `rejected`. Only an approval
//! mutates equipment stock, and only inside the repository's transaction.

/// Stock is added to the equipment row on approval.
pub const CHANGE_IMPORT: &str = "import";

/// Stock is removed from the equipment row on approval.
pub const CHANGE_EXPORT: &str = "export";

/// All valid change types.
pub const VALID_CHANGE_TYPES: &[&str] = &[CHANGE_IMPORT, CHANGE_EXPORT];

/// Request awaiting a reviewer decision.
pub const CHANGE_PENDING: &str = "pending";

/// Request accepted; stock adjustment applied.
pub const CHANGE_APPROVED: &str = "approved";

/// Request declined; no stock effect.
pub const CHANGE_REJECTED: &str = "rejected";

/// All valid change statuses.
pub const VALID_CHANGE_STATUSES: &[&str] = &[CHANGE_PENDING, CHANGE_APPROVED, CHANGE_REJECTED];

/// Validate that a change type string is one of the accepted values.
pub fn validate_change_type(change_type: &str) -> Result<(), String> {
    if VALID_CHANGE_TYPES.contains(&change_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid change type '{change_type}'. Must be one of: {}",
            VALID_CHANGE_TYPES.join(", ")
        ))
    }
}

/// Validate that a requested change quantity is strictly positive.
pub fn validate_change_quantity(quantity: i32) -> Result<(), String> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(format!("Change quantity must be positive, got {quantity}"))
    }
}

/// Check that an export request can be satisfied by the available stock.
///
/// Used both at creation time (against the stock seen then) and again at
/// approval time against the current, row-locked quantity. The error
/// message names the available quantity so callers can surface it as-is.
pub fn check_export_stock(available: i32, requested: i32) -> Result<(), String> {
    if requested > available {
        Err(format!(
            "Insufficient quantity: requested {requested}, available {available}"
        ))
    } else {
        Ok(())
    }
}

/// The quantity delta an approved change applies to its equipment row.
///
/// Positive for imports, negative for exports. Callers must validate the
/// change type first; unknown types yield a zero delta.
pub fn stock_delta(change_type: &str, quantity: i32) -> i32 {
    match change_type {
        CHANGE_IMPORT => quantity,
        CHANGE_EXPORT => -quantity,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_change_types_accepted() {
        assert!(validate_change_type(CHANGE_IMPORT).is_ok());
        assert!(validate_change_type(CHANGE_EXPORT).is_ok());
    }

    #[test]
    fn test_invalid_change_type_rejected() {
        let result = validate_change_type("transfer");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid change type"));
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        assert!(validate_change_quantity(0).is_err());
        assert!(validate_change_quantity(-3).is_err());
        assert!(validate_change_quantity(1).is_ok());
    }

    #[test]
    fn test_export_exceeding_stock_rejected() {
        let result = check_export_stock(10, 15);
        assert!(result.is_err());
        let msg = result.unwrap_err();
        assert!(msg.contains("available 10"));
        assert!(msg.contains("requested 15"));
    }

    #[test]
    fn test_export_within_stock_accepted() {
        assert!(check_export_stock(10, 10).is_ok());
        assert!(check_export_stock(10, 1).is_ok());
    }

    #[test]
    fn test_stock_delta_signs() {
        assert_eq!(stock_delta(CHANGE_IMPORT, 5), 5);
        assert_eq!(stock_delta(CHANGE_EXPORT, 5), -5);
        assert_eq!(stock_delta("unknown", 5), 0);
    }
}
