// CSV export of tabular records
use chrono::NaiveDate;

use crate::api::models::ContactMessage;
use crate::render;

/// One output column: a header and how to pull its text out of a row.
pub struct Column<T> {
    pub header: &'static str,
    pub value: fn(&T) -> String,
}

/// A finished export ready to be served as a download.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Write `rows` as CSV with a header line. Any field holding a comma, quote
/// or line break is quoted, with embedded quotes doubled.
pub fn export_csv<T>(rows: &[T], columns: &[Column<T>]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.header))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| (c.value)(row)))?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", prefix, date.format("%Y-%m-%d"))
}

pub fn message_columns() -> Vec<Column<ContactMessage>> {
    vec![
        Column {
            header: "Name",
            value: |m| m.name.clone(),
        },
        Column {
            header: "Email",
            value: |m| m.email.clone(),
        },
        Column {
            header: "Phone",
            value: |m| render::phone_or_missing(m.phone.as_deref()),
        },
        Column {
            header: "Message",
            value: |m| m.message.clone(),
        },
        Column {
            header: "Status",
            value: |m| m.status.to_string(),
        },
        Column {
            header: "Received",
            value: |m| render::display_time(m.created_at),
        },
    ]
}

pub fn export_messages(messages: &[ContactMessage], today: NaiveDate) -> Result<CsvExport, csv::Error> {
    Ok(CsvExport {
        filename: export_file_name("messages", today),
        content: export_csv(messages, &message_columns())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::MessageStatus;

    fn message(name: &str, text: &str) -> ContactMessage {
        ContactMessage {
            id: "m1".into(),
            name: name.into(),
            email: "a@example.com".into(),
            phone: None,
            message: text.into(),
            status: MessageStatus::New,
            created_at: None,
        }
    }

    #[test]
    fn writes_header_then_rows() {
        let out = export_csv(&[message("Ada", "hi")], &message_columns()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Name,Email,Phone,Message,Status,Received\nAda,a@example.com,N/A,hi,new,-\n"
        );
    }

    #[test]
    fn quotes_every_field_that_needs_it() {
        let out = export_csv(
            &[message("Lovelace, Ada", "she said \"hi\"")],
            &message_columns(),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Lovelace, Ada\""));
        assert!(text.contains("\"she said \"\"hi\"\"\""));
    }

    #[test]
    fn empty_input_still_has_header() {
        let out = export_csv::<ContactMessage>(&[], &message_columns()).unwrap();
        assert_eq!(out, b"Name,Email,Phone,Message,Status,Received\n");
    }

    #[test]
    fn file_name_carries_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name("messages", date), "messages_2024-03-09.csv");
    }
}
