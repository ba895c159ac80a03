//! CSV export for simulated hour records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourRecord;

/// Column header for CSV telemetry export.
const HEADER: &str = "index,day,hour,price_per_kwh,base_load_kw,technology_sum_pct,\
                       effective_curtailment_pct,curtailed_kw,load_used_kw,cost,savings,\
                       emissions_saved_kg,comfort_penalty,satisfaction,event";

/// Exports hour records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Simulated hours, in order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[HourRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes hour records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[HourRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.index.to_string(),
            r.day.to_string(),
            r.hour.to_string(),
            format!("{:.4}", r.price),
            format!("{:.4}", r.base_load_kw),
            format!("{:.2}", r.technology_sum_pct),
            format!("{:.2}", r.effective_curtailment_pct),
            format!("{:.4}", r.curtailed_kw),
            format!("{:.4}", r.load_used_kw),
            format!("{:.4}", r.cost),
            format!("{:.4}", r.savings),
            format!("{:.4}", r.emissions_saved_kg),
            r.comfort_penalty.to_string(),
            r.satisfaction.to_string(),
            r.event.map(|e| e.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::event::GridEvent;

    fn make_record(hour: usize) -> HourRecord {
        HourRecord {
            index: hour,
            day: 1,
            hour,
            price: 0.20,
            base_load_kw: 4.0,
            technology_sum_pct: 15.0,
            effective_curtailment_pct: 15.0,
            curtailed_kw: 0.6,
            load_used_kw: 3.4,
            cost: 0.68,
            savings: 0.12,
            emissions_saved_kg: 0.21,
            comfort_penalty: 0,
            satisfaction: 100,
            event: (hour >= 16).then_some(GridEvent::PeakHours),
        }
    }

    fn to_string(records: &[HourRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(records, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_matches_schema() {
        let output = to_string(&[make_record(0)]);
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "index,day,hour,price_per_kwh,base_load_kw,technology_sum_pct,\
             effective_curtailment_pct,curtailed_kw,load_used_kw,cost,savings,\
             emissions_saved_kg,comfort_penalty,satisfaction,event"
        );
    }

    #[test]
    fn row_count_matches_hours() {
        let records: Vec<HourRecord> = (0..24).map(make_record).collect();
        let output = to_string(&records);
        // 1 header + 24 data rows
        assert_eq!(output.lines().count(), 25);
    }

    #[test]
    fn deterministic_output() {
        let records: Vec<HourRecord> = (0..5).map(make_record).collect();
        assert_eq!(to_string(&records), to_string(&records));
    }

    #[test]
    fn event_column_is_quoted_message_or_empty() {
        let records = vec![make_record(3), make_record(17)];
        let csv_text = to_string(&records);
        let mut rdr = csv::ReaderBuilder::new().from_reader(csv_text.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(14), Some(""));
        assert_eq!(
            rows[1].get(14),
            Some("Peak Hours - Demand Response Opportunity")
        );
        assert_eq!(rows[1].get(3), Some("0.2000"));
    }
}
