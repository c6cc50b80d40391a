//! Output formatting for one-shot scan results.
//!
//! Table rendering uses `tabled`; structured formats use serde.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use airscope_core::{NetworkRecord, SignalQuality};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "SIGNAL")]
    signal: String,
    #[tabled(rename = "QUALITY")]
    quality: String,
    #[tabled(rename = "SECURITY")]
    security: String,
    #[tabled(rename = "CHAN")]
    channel: String,
    #[tabled(rename = "FREQ")]
    frequency: String,
}

/// Render scan records in the chosen format.
pub fn render_records(
    format: &OutputFormat,
    records: &[NetworkRecord],
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_table(records)),
        OutputFormat::Json => serde_json::to_string_pretty(records).map_err(CliError::from),
        OutputFormat::JsonCompact => serde_json::to_string(records).map_err(CliError::from),
    }
}

fn render_table(records: &[NetworkRecord]) -> String {
    if records.is_empty() {
        return "No networks found".into();
    }

    let rows: Vec<NetworkRow> = records
        .iter()
        .map(|record| NetworkRow {
            ssid: record.ssid.clone(),
            signal: format!("{}%", record.signal),
            quality: quality_cell(record.quality),
            security: record.security.clone(),
            channel: record.channel.clone(),
            frequency: record.frequency.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn quality_cell(quality: SignalQuality) -> String {
    match quality {
        SignalQuality::Excellent => quality.to_string().green().to_string(),
        SignalQuality::Good => quality.to_string().cyan().to_string(),
        SignalQuality::Fair => quality.to_string().yellow().to_string(),
        SignalQuality::Poor => quality.to_string().red().to_string(),
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    println!("{output}");
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ssid: &str, signal: i64) -> NetworkRecord {
        NetworkRecord {
            ssid: ssid.into(),
            signal,
            security: "WPA2".into(),
            channel: "6".into(),
            frequency: "2437".into(),
            quality: SignalQuality::from_signal(signal),
        }
    }

    #[test]
    fn empty_table_has_placeholder() {
        assert_eq!(render_table(&[]), "No networks found");
    }

    #[test]
    fn table_contains_every_ssid() {
        let table = render_table(&[record("HomeNetwork", 82), record("GuestWifi", 40)]);
        assert!(table.contains("HomeNetwork"));
        assert!(table.contains("GuestWifi"));
        assert!(table.contains("82%"));
    }

    #[test]
    fn json_output_is_parseable() {
        let rendered = render_records(&OutputFormat::JsonCompact, &[record("A", 70)])
            .expect("json renders");
        let parsed: Vec<NetworkRecord> = serde_json::from_str(&rendered).expect("round trip");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].ssid, "A");
    }
}
