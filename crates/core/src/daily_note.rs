//! Daily note constants and consumption-line validation.
//!
//! A daily note is a farmer's field report against an assigned task: either
//! a `harvest` record (quantity collected) or a `consumption` record that
//! lists equipment lines to be deducted from farm stock.

/// Quantity collected for the task, no stock effect.
pub const NOTE_HARVEST: &str = "harvest";

/// Equipment usage; each listed line decrements equipment stock.
pub const NOTE_CONSUMPTION: &str = "consumption";

/// All valid note types.
pub const VALID_NOTE_TYPES: &[&str] = &[NOTE_HARVEST, NOTE_CONSUMPTION];

/// One equipment line of a consumption note, prior to persistence.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ConsumptionLine {
    pub equipment_id: crate::types::DbId,
    pub quantity: i32,
}

/// Validate that a note type string is one of the accepted values.
pub fn validate_note_type(note_type: &str) -> Result<(), String> {
    if VALID_NOTE_TYPES.contains(&note_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid note type '{note_type}'. Must be one of: {}",
            VALID_NOTE_TYPES.join(", ")
        ))
    }
}

/// Validate the shape of a consumption note's equipment lines.
///
/// A consumption note needs at least one line, every line quantity must be
/// positive, and no equipment may appear twice (duplicates would make the
/// per-line stock check unsound).
pub fn validate_consumption_lines(lines: &[ConsumptionLine]) -> Result<(), String> {
    if lines.is_empty() {
        return Err("A consumption note must list at least one equipment line".to_string());
    }
    let mut seen = std::collections::HashSet::new();
    for line in lines {
        if line.quantity <= 0 {
            return Err(format!(
                "Line quantity for equipment {} must be positive, got {}",
                line.equipment_id, line.quantity
            ));
        }
        if !seen.insert(line.equipment_id) {
            return Err(format!(
                "Equipment {} is listed more than once",
                line.equipment_id
            ));
        }
    }
    Ok(())
}
