use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Device class a rank is measured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
}

impl Device {
    /// Lookup order within one keyword check.
    pub const ALL: [Device; 2] = [Device::Desktop, Device::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dated snapshot of a keyword's rank per device. `None` means the
/// domain was not on the first two result pages.
///
/// Files written by the single-device tracker stored `position` only; it is
/// read back as the desktop rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    #[serde(default, alias = "position")]
    pub desktop: Option<u32>,
    #[serde(default)]
    pub mobile: Option<u32>,
}

impl HistoryRecord {
    pub fn new(date: NaiveDate, desktop: Option<u32>, mobile: Option<u32>) -> Self {
        Self {
            date,
            desktop,
            mobile,
        }
    }

    pub fn rank(&self, device: Device) -> Option<u32> {
        match device {
            Device::Desktop => self.desktop,
            Device::Mobile => self.mobile,
        }
    }
}

/// Per-keyword line of a rank-check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub keyword: String,
    pub desktop: String,
    pub mobile: String,
}

impl RankEntry {
    pub fn from_record(keyword: &str, record: &HistoryRecord) -> Self {
        Self {
            keyword: keyword.to_string(),
            desktop: describe_rank(record.desktop),
            mobile: describe_rank(record.mobile),
        }
    }
}

/// `"position N"` or `"not found"`.
pub fn describe_rank(rank: Option<u32>) -> String {
    match rank {
        Some(n) => format!("position {n}"),
        None => "not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn record_serializes_as_iso_date_and_nullable_ranks() {
        let record = HistoryRecord::new(date("2026-03-01"), Some(3), None);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": "2026-03-01", "desktop": 3, "mobile": null})
        );
    }

    #[test]
    fn legacy_position_reads_as_desktop() {
        let record: HistoryRecord =
            serde_json::from_str(r#"{"date": "2025-01-20", "position": 7}"#).unwrap();
        assert_eq!(record.rank(Device::Desktop), Some(7));
        assert_eq!(record.rank(Device::Mobile), None);
    }

    #[test]
    fn legacy_null_position() {
        let record: HistoryRecord =
            serde_json::from_str(r#"{"date": "2025-01-20", "position": null}"#).unwrap();
        assert_eq!(record.desktop, None);
    }

    #[test]
    fn entry_describes_ranks() {
        let record = HistoryRecord::new(date("2026-03-01"), Some(11), None);
        let entry = RankEntry::from_record("running shoes", &record);
        assert_eq!(entry.keyword, "running shoes");
        assert_eq!(entry.desktop, "position 11");
        assert_eq!(entry.mobile, "not found");
    }
}
