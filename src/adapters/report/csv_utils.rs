//! CSV utilities for study-log exports. Uses the `csv` crate for quoting and escaping.

use crate::domain::StudyLogRecord;

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// One row per log entry: `logged_at,date,subject,minutes,message`.
pub fn study_logs_to_csv(records: &[StudyLogRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());
    wtr.write_record(["logged_at", "date", "subject", "minutes", "message"])?;

    for r in records {
        // keep one row per entry
        let clean_text = r.raw_message.replace('\n', " ").replace('\r', "");
        wtr.write_record([
            r.logged_at.as_str(),
            &r.local_date.format("%Y-%m-%d").to_string(),
            r.subject.as_str(),
            &r.minutes.to_string(),
            &clean_text,
        ])?;
    }

    wtr.flush()?;
    finish(wtr)
}
