use rust_xlsxwriter::Workbook;

use crate::domain::GuestHistoryEntry;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};

/// Export the guest-history ledger as a spreadsheet download.
pub fn export_history_xlsx(entries: &[GuestHistoryEntry]) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "Guest",
        "Room",
        "Type",
        "Check-in",
        "Check-out",
        "Guests",
        "Total Price",
        "Status",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| ServerError::XlsxError(format!("failed to write header '{header}': {e}")))?;
    }

    for (i, entry) in entries.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &entry.guest.name)
            .map_err(|e| ServerError::XlsxError(format!("failed to write guest name: {e}")))?;
        worksheet
            .write_string(r, 1, &entry.room_number)
            .map_err(|e| ServerError::XlsxError(format!("failed to write room number: {e}")))?;
        worksheet
            .write_string(r, 2, entry.room_type.as_str())
            .map_err(|e| ServerError::XlsxError(format!("failed to write room type: {e}")))?;
        worksheet
            .write_string(r, 3, entry.check_in_date.to_string())
            .map_err(|e| ServerError::XlsxError(format!("failed to write check-in: {e}")))?;
        worksheet
            .write_string(r, 4, entry.check_out_date.to_string())
            .map_err(|e| ServerError::XlsxError(format!("failed to write check-out: {e}")))?;
        worksheet
            .write_number(r, 5, entry.guest.guests as f64)
            .map_err(|e| ServerError::XlsxError(format!("failed to write party size: {e}")))?;
        worksheet
            .write_number(r, 6, entry.total_price)
            .map_err(|e| ServerError::XlsxError(format!("failed to write total price: {e}")))?;
        worksheet
            .write_string(r, 7, entry.status.as_str())
            .map_err(|e| ServerError::XlsxError(format!("failed to write status: {e}")))?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("failed to build workbook: {e}")))?;

    xlsx_response(buffer, "guest_history.xlsx")
}
