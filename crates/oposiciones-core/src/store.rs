//! JSON output files
//!
//! Every run overwrites its files completely. Output is pretty-printed with
//! two-space indentation and keeps non-ASCII characters as-is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{Announcement, Aspirant, SectionHarvest};

/// Name of the combined announcements file
pub const ANNOUNCEMENTS_FILE: &str = "convocatorias.json";

/// File name holding one section's registrations.
///
/// # Examples
/// ```
/// use oposiciones_core::store::registration_file_name;
///
/// assert_eq!(registration_file_name("tribunal1"), "tribunal1_inscritos.json");
/// ```
pub fn registration_file_name(section: &str) -> String {
    format!("{}_inscritos.json", section)
}

/// Serialize `value` to `path`, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write one file per section that produced records.
///
/// Sections without records get no file; their previous output, if any, is
/// left untouched.
///
/// # Returns
/// The paths written, in section order.
pub fn write_registrations(
    dir: &Path,
    harvests: &[SectionHarvest<Aspirant>],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for harvest in harvests {
        if harvest.is_empty() {
            warn!(section = %harvest.section, "No data extracted, file not written");
            continue;
        }

        let path = dir.join(registration_file_name(&harvest.section));
        write_json(&path, &harvest.records)?;
        info!(
            section = %harvest.section,
            records = harvest.records.len(),
            path = %path.display(),
            "Saved registrations"
        );
        written.push(path);
    }

    Ok(written)
}

/// Write all sections' announcements into one object keyed by section name.
pub fn write_announcements(
    dir: &Path,
    harvests: &[SectionHarvest<Announcement>],
) -> Result<PathBuf> {
    let mut by_section = Map::new();
    for harvest in harvests {
        by_section.insert(harvest.section.clone(), serde_json::to_value(&harvest.records)?);
    }

    let path = dir.join(ANNOUNCEMENTS_FILE);
    write_json(&path, &Value::Object(by_section))?;
    info!(sections = harvests.len(), path = %path.display(), "Saved announcements");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CallRange, SectionStatus};
    use chrono::NaiveDate;

    fn registrations(section: &str, records: Vec<Aspirant>) -> SectionHarvest<Aspirant> {
        SectionHarvest::completed(section, records, 1)
    }

    #[test]
    fn test_write_json_pretty_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        let records = vec![Aspirant::new(1, 501, "María", "Núñez", "Libre")];

        write_json(&path, &records).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"nombre_apellidos\": \"Núñez, María\""));
        assert!(text.starts_with("[\n  {\n    \"numero_orden\": 1,"));
    }

    #[test]
    fn test_write_json_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &vec![1, 2, 3]).unwrap();
        write_json(&path, &Vec::<u32>::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_registrations_skips_empty_sections() {
        let dir = tempfile::tempdir().unwrap();
        let harvests = vec![
            registrations("tribunal1", vec![Aspirant::new(1, 501, "Maria", "Garcia", "Libre")]),
            registrations("tribunal2", vec![]),
        ];

        let written = write_registrations(dir.path(), &harvests).unwrap();

        assert_eq!(written, vec![dir.path().join("tribunal1_inscritos.json")]);
        assert!(!dir.path().join("tribunal2_inscritos.json").exists());

        let parsed: Vec<Aspirant> =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(parsed, harvests[0].records);
    }

    #[test]
    fn test_write_registrations_keeps_partial_failed_sections() {
        let dir = tempfile::tempdir().unwrap();
        let harvest = SectionHarvest::failed(
            "tribunal1",
            vec![Aspirant::new(1, 501, "Maria", "Garcia", "Libre")],
            1,
            "browser crashed",
        );
        assert!(matches!(harvest.status, SectionStatus::Failed(_)));

        let written = write_registrations(dir.path(), &[harvest]).unwrap();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_write_announcements_keyed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let harvests = vec![
            SectionHarvest::completed(
                "tribunal2",
                vec![Announcement {
                    date: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
                    ranges: vec![CallRange { start: 1, end: 50 }, CallRange { start: 51, end: 60 }],
                }],
                1,
            ),
            SectionHarvest::completed("tribunal1", vec![], 0),
        ];

        let path = write_announcements(&dir.path().join("data"), &harvests).unwrap();
        assert_eq!(path, dir.path().join("data/convocatorias.json"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.find("tribunal2").unwrap() < text.find("tribunal1").unwrap());

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tribunal2": [{
                    "fecha": "2025-05-05",
                    "convocados": [{"inicio": 1, "fin": 50}, {"inicio": 51, "fin": 60}]
                }],
                "tribunal1": []
            })
        );
    }
}
