//! CSV import and export of connections.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::{ConnectionRecord, StoreError};
use crate::domain::Costs;
use crate::network::Network;

/// Column order of the connection file.
const COLUMNS: [&str; 7] = [
    "source",
    "destination",
    "distance",
    "time",
    "cost",
    "transfers",
    "transport_mode",
];

/// Mode recorded for rows written without a `transport_mode` column.
const DEFAULT_MODE: &str = "mixed";

/// Outcome of a CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Connections added to the network
    pub imported: usize,
    /// Rows that failed to parse or were rejected by the network
    pub skipped: usize,
    /// Endpoints that did not exist and were created at (0, 0)
    pub created_locations: usize,
}

/// Read connections from CSV into `network`.
///
/// The first row is a header and is skipped; columns are read by position.
/// Names and modes are kept exactly as written, while numeric columns may be
/// padded with whitespace. A row with only six columns gets the mode
/// `"mixed"`. Endpoints the network does not know are created at coordinates
/// (0, 0) with no category. Rows that fail to parse, carry invalid costs or
/// repeat an existing ordered pair are skipped and counted rather than
/// aborting the import.
///
/// # Errors
///
/// Fails only if the header itself cannot be read.
pub fn import_connections<R: Read>(network: &mut Network, reader: R) -> Result<ImportSummary, StoreError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    csv.headers()?;
    let columns = csv::StringRecord::from(COLUMNS.to_vec());

    let mut summary = ImportSummary::default();

    for (row, record) in csv.records().enumerate() {
        // Header is line 1
        let line = row + 2;
        let parsed = record.and_then(|r| normalize_row(&r).deserialize::<ConnectionRecord>(Some(&columns)));
        let record = match parsed {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable connection row");
                summary.skipped += 1;
                continue;
            }
        };

        let costs = match Costs::new(record.distance, record.time, record.cost, record.transfers) {
            Ok(costs) => costs,
            Err(e) => {
                warn!(line, error = %e, "skipping connection row with invalid costs");
                summary.skipped += 1;
                continue;
            }
        };

        for endpoint in [&record.source, &record.destination] {
            if network.has_location(endpoint) {
                continue;
            }
            match network.add_location(endpoint, 0.0, 0.0, None) {
                Ok(()) => summary.created_locations += 1,
                Err(e) => debug!(line, location = %endpoint, error = %e, "could not create endpoint"),
            }
        }

        match network.add_connection(&record.source, &record.destination, costs, &record.transport_mode) {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                warn!(line, error = %e, "skipping connection row");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Trim the numeric columns and supply the mode of a six-column row.
fn normalize_row(row: &csv::StringRecord) -> csv::StringRecord {
    let mut normalized: csv::StringRecord = row
        .iter()
        .enumerate()
        .map(|(i, field)| if (2..6).contains(&i) { field.trim() } else { field })
        .collect();
    if normalized.len() == COLUMNS.len() - 1 {
        normalized.push_field(DEFAULT_MODE);
    }
    normalized
}

/// Write every connection in `network` as CSV, header first.
pub fn export_connections<W: Write>(network: &Network, writer: W) -> Result<usize, StoreError> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut written = 0;

    for connection in network.all_connections() {
        csv.serialize(ConnectionRecord::from(connection))?;
        written += 1;
    }

    // A header is still wanted for an empty network
    if written == 0 {
        csv.write_record(COLUMNS)?;
    }

    csv.flush()?;
    Ok(written)
}

/// Build a new network from a CSV file of connections.
///
/// Locations are created from the connection endpoints; see
/// [`import_connections`].
pub fn load_network(path: impl AsRef<Path>) -> Result<(Network, ImportSummary), StoreError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let mut network = Network::new();
    let summary = import_connections(&mut network, file)?;

    info!(
        path = %path.display(),
        imported = summary.imported,
        skipped = summary.skipped,
        locations = network.location_count(),
        "loaded network from CSV"
    );
    Ok((network, summary))
}

/// Write a network's connections to a CSV file, replacing it.
pub fn save_network(network: &Network, path: impl AsRef<Path>) -> Result<usize, StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let written = export_connections(network, File::create(path)?)?;
    info!(path = %path.display(), connections = written, "saved network to CSV");
    Ok(written)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const NAMES: [&str; 6] = ["S0", " S1", "S2 ", "Gambir Station", "R,1", "\"Q\""];

    fn connections() -> impl Strategy<Value = Vec<(usize, usize, f64, f64, f64, u32, String)>> {
        proptest::collection::vec(
            (
                0..NAMES.len(),
                0..NAMES.len(),
                0.0f64..1e6,
                0.0f64..1e4,
                0.0f64..1e5,
                0u32..5,
                prop_oneof![Just(String::new()), " ?[a-z]{1,8} ?"],
            ),
            0..20,
        )
    }

    proptest! {
        /// Exporting then importing reproduces every connection exactly
        #[test]
        fn export_import_preserves_connections(rows in connections()) {
            let mut network = Network::new();
            for name in NAMES {
                network.add_location(name, 0.0, 0.0, None).unwrap();
            }
            for (s, d, dist, time, fare, tr, mode) in &rows {
                let costs = Costs::new(*dist, *time, *fare, *tr).unwrap();
                let _ = network.add_connection(NAMES[*s], NAMES[*d], costs, mode);
            }

            let mut out = Vec::new();
            export_connections(&network, &mut out).unwrap();

            let mut restored = Network::new();
            let summary = import_connections(&mut restored, out.as_slice()).unwrap();
            prop_assert_eq!(summary.skipped, 0);
            prop_assert_eq!(summary.imported, network.connection_count());

            let original: Vec<_> = network.all_connections().collect();
            let copied: Vec<_> = restored.all_connections().collect();
            prop_assert_eq!(original, copied);
        }
    }
}
