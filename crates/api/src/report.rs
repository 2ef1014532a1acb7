//! XLSX report generation.
//!
//! Rows in, spreadsheet bytes out; handlers attach the content type and
//! disposition headers.

use agrihub_db::models::equipment_change::EquipmentChangeRow;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// Column headers of the equipment-change report sheet.
const HEADERS: [&str; 7] = [
    "ID",
    "Equipment",
    "Type",
    "Quantity",
    "Status",
    "Reject Reason",
    "Created At",
];

/// Render a farm's equipment change history as an XLSX workbook.
pub fn equipment_change_report(rows: &[EquipmentChangeRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("Equipment Changes")?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_number(r, 0, row.id as f64)?;
        sheet.write_string(r, 1, &row.equipment_name)?;
        sheet.write_string(r, 2, &row.change_type)?;
        sheet.write_number(r, 3, f64::from(row.quantity))?;
        sheet.write_string(r, 4, &row.status)?;
        sheet.write_string(r, 5, row.reject_reason.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 6, &row.created_at.to_rfc3339())?;
    }

    sheet.autofit();
    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_row(id: i64, name: &str) -> EquipmentChangeRow {
        EquipmentChangeRow {
            id,
            equipment_id: 1,
            equipment_name: name.to_string(),
            change_type: "import".to_string(),
            quantity: 5,
            status: "approved".to_string(),
            reject_reason: None,
            created_at: Utc::now(),
            reviewed_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_report_produces_xlsx_bytes() {
        let rows = vec![sample_row(1, "Shovel"), sample_row(2, "Tractor")];
        let bytes = equipment_change_report(&rows).expect("report generation should succeed");

        // XLSX files are ZIP archives; check the magic number.
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_empty_report_still_valid() {
        let bytes = equipment_change_report(&[]).expect("empty report should succeed");
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
