//! Parsing of `ignite ps` output.
//!
//! The listing is a header line followed by whitespace-separated rows:
//!
//! ```text
//! VM ID            IMAGE          KERNEL               SIZE    CPUS  MEMORY   CREATED  STATUS   IPS        PORTS  NAME
//! 5f3c9e0a1b2c3d4e img:v1         weaveworks/kernel:5  3.0 GB  2     1.0 GB   4m ago   Up 4m    10.61.0.4         node-a
//! ```
//!
//! Columns are recovered by position after splitting on whitespace, which
//! means multi-word cells (size, memory, created) span two fields. Any change
//! to ignite's column layout breaks this mapping, so the offsets live in the
//! constants below and nowhere else.

use poridhi_core::error::{ProvisionError, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Rows with fewer fields are dropped from listings.
pub const LISTING_MIN_FIELDS: usize = 14;
/// Rows with fewer fields are ignored by address lookup.
pub const ADDRESS_MIN_FIELDS: usize = 13;

pub const COL_ID: usize = 0;
pub const COL_IMAGE: usize = 1;
pub const COL_KERNEL: usize = 2;
/// First of two fields: value and unit.
pub const COL_SIZE: usize = 3;
pub const COL_CPUS: usize = 5;
/// First of two fields: value and unit.
pub const COL_MEMORY: usize = 6;
/// First of two fields.
pub const COL_CREATED: usize = 8;
pub const COL_STATUS: usize = 10;
pub const COL_IP: usize = 12;

const HEADER_FIRST_TOKEN: &str = "VM";

/// Column titles in display order, matching [`VmRecord::columns`].
pub const RECORD_HEADERS: [&str; 10] = [
    "VM ID", "NAME", "IMAGE", "KERNEL", "SIZE", "CPUS", "MEMORY", "CREATED", "STATUS", "IP",
];

/// One VM as reported by `ignite ps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    pub kernel: String,
    pub size: String,
    pub cpus: String,
    pub memory: String,
    pub created: String,
    pub status: String,
    pub ip: String,
}

impl VmRecord {
    /// Reassemble a record from a split row, or `None` if the row is too short.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        if fields.len() < LISTING_MIN_FIELDS {
            return None;
        }
        let pair = |start: usize| format!("{} {}", fields[start], fields[start + 1]);
        Some(Self {
            id: fields[COL_ID].to_string(),
            name: fields[fields.len() - 1].to_string(),
            image: fields[COL_IMAGE].to_string(),
            kernel: fields[COL_KERNEL].to_string(),
            size: pair(COL_SIZE),
            cpus: fields[COL_CPUS].to_string(),
            memory: pair(COL_MEMORY),
            created: pair(COL_CREATED),
            status: fields[COL_STATUS].to_string(),
            ip: fields[COL_IP].to_string(),
        })
    }

    /// Cell values in [`RECORD_HEADERS`] order.
    pub fn columns(&self) -> [&str; 10] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.image.as_str(),
            self.kernel.as_str(),
            self.size.as_str(),
            self.cpus.as_str(),
            self.memory.as_str(),
            self.created.as_str(),
            self.status.as_str(),
            self.ip.as_str(),
        ]
    }
}

/// Parse a full listing. Malformed rows are skipped, never reported.
pub fn parse_listing(output: &str) -> Vec<VmRecord> {
    let mut lines = output.lines();
    if let Some(header) = lines.next() {
        check_header(header);
    }

    lines
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let record = VmRecord::from_fields(&fields);
            if record.is_none() {
                debug!(
                    fields = fields.len(),
                    expected = LISTING_MIN_FIELDS,
                    "skipping malformed listing row"
                );
            }
            record
        })
        .collect()
}

/// Find the address of the first row mentioning `name`.
///
/// Matching is by substring over the raw line, so `node` also matches a row
/// for `node-a`; the first qualifying row wins.
pub fn find_address(output: &str, name: &str) -> Result<String> {
    output
        .lines()
        .filter(|line| line.contains(name))
        .find_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            (fields.len() >= ADDRESS_MIN_FIELDS).then(|| fields[COL_IP].to_string())
        })
        .ok_or_else(|| ProvisionError::AddressNotFound(name.to_string()))
}

fn check_header(header: &str) {
    let first = header.split_whitespace().next();
    if first.is_some_and(|token| token != HEADER_FIRST_TOKEN) {
        warn!(
            header = header.trim(),
            "unexpected ignite ps header, column layout may have changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "VM ID  IMAGE  KERNEL  SIZE  CPUS  MEMORY  CREATED  STATUS  IPS  PORTS  NAME";

    fn row(fields: &[&str]) -> String {
        fields.join("   ")
    }

    fn node_a_fields() -> Vec<&'static str> {
        vec![
            "i-1", "img", "k", "1", "GB", "2", "512", "MB", "Jan", "1", "Running", "extra",
            "10.0.0.5", "node-a",
        ]
    }

    #[test]
    fn test_parse_well_formed_row() {
        let listing = format!("{HEADER}\n{}\n", row(&node_a_fields()));
        let records = parse_listing(&listing);
        assert_eq!(
            records,
            vec![VmRecord {
                id: "i-1".into(),
                name: "node-a".into(),
                image: "img".into(),
                kernel: "k".into(),
                size: "1 GB".into(),
                cpus: "2".into(),
                memory: "512 MB".into(),
                created: "Jan 1".into(),
                status: "Running".into(),
                ip: "10.0.0.5".into(),
            }]
        );
    }

    #[test]
    fn test_name_taken_from_last_field() {
        let mut fields = node_a_fields();
        fields.insert(13, "0.0.0.0:2222->22/tcp");
        let listing = format!("{HEADER}\n{}", row(&fields));
        let records = parse_listing(&listing);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "node-a");
        assert_eq!(records[0].ip, "10.0.0.5");
    }

    #[test]
    fn test_short_row_dropped_without_error() {
        let short = row(&node_a_fields()[..13]);
        let listing = format!("{HEADER}\n{short}\n{}\n", row(&node_a_fields()));
        let records = parse_listing(&listing);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "i-1");
    }

    #[test]
    fn test_header_and_blank_lines_skipped() {
        let listing = format!("{HEADER}\n\n   \n{}\n\n", row(&node_a_fields()));
        assert_eq!(parse_listing(&listing).len(), 1);
        assert!(parse_listing(HEADER).is_empty());
        assert!(parse_listing("").is_empty());
    }

    #[test]
    fn test_first_line_always_treated_as_header() {
        // A data row in the header position is not a record.
        let listing = format!("{}\n{}", row(&node_a_fields()), row(&node_a_fields()));
        assert_eq!(parse_listing(&listing).len(), 1);
    }

    #[test]
    fn test_unexpected_header_still_parsed() {
        let listing = format!("ID NAME STATE\n{}", row(&node_a_fields()));
        assert_eq!(parse_listing(&listing).len(), 1);
    }

    #[test]
    fn test_columns_follow_header_order() {
        let record = VmRecord::from_fields(&node_a_fields()).unwrap();
        let columns = record.columns();
        assert_eq!(columns.len(), RECORD_HEADERS.len());
        assert_eq!(columns[0], "i-1");
        assert_eq!(columns[1], "node-a");
        assert_eq!(columns[9], "10.0.0.5");
    }

    #[test]
    fn test_find_address_for_matching_row() {
        let listing = format!("{HEADER}\n{}\n", row(&node_a_fields()));
        assert_eq!(find_address(&listing, "node-a").unwrap(), "10.0.0.5");
    }

    #[test]
    fn test_find_address_accepts_13_fields() {
        let listing = format!("{HEADER}\n{}\n", row(&node_a_fields()[..13]));
        // 13 fields is enough for lookup but not for a listing record.
        assert_eq!(find_address(&listing, "i-1").unwrap(), "10.0.0.5");
        assert!(parse_listing(&listing).is_empty());
    }

    #[test]
    fn test_find_address_skips_short_matching_rows() {
        let listing = format!("{HEADER}\nnode-a pending\n{}\n", row(&node_a_fields()));
        assert_eq!(find_address(&listing, "node-a").unwrap(), "10.0.0.5");
    }

    #[test]
    fn test_find_address_missing_name() {
        let listing = format!("{HEADER}\n{}\n", row(&node_a_fields()));
        let err = find_address(&listing, "node-b").unwrap_err();
        assert!(matches!(err, ProvisionError::AddressNotFound(ref n) if n == "node-b"));
    }
}
