use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;

use crate::predict::error::PredictError;
use crate::predict::history::TleHistory;
use crate::predict::types::OrbitalRecord;

/// Reads every element set in a folder and groups them by NORAD id.
pub struct TleLoader {
    tle_dir: PathBuf,
    records: BTreeMap<u64, Vec<OrbitalRecord>>,
}

impl TleLoader {
    pub fn new(tle_dir: PathBuf) -> Self {
        Self {
            tle_dir,
            records: BTreeMap::new(),
        }
    }

    /// Load all TLE files from the directory
    pub fn load_all(&mut self) -> Result<(), PredictError> {
        if !self.tle_dir.exists() {
            return Err(PredictError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        self.records.clear();

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.tle_dir)? {
            let path = entry?.path();
            let is_tle = path
                .extension()
                .is_some_and(|ext| ext == "tle" || ext == "txt");
            if path.is_file() && is_tle {
                paths.push(path);
            }
        }
        // Stable order so equal epochs resolve the same way on every load.
        paths.sort();

        for path in paths {
            match parse_tle_file(&path) {
                Ok(records) => {
                    log::debug!("Loaded {} element sets from {}", records.len(), path.display());
                    for record in records {
                        self.records
                            .entry(record.info.norad_id)
                            .or_default()
                            .push(record);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                    // Continue with other files
                }
            }
        }

        Ok(())
    }

    pub fn satellite_count(&self) -> usize {
        self.records.len()
    }

    /// Consume the loader, producing one history per satellite.
    pub fn into_histories(self, final_validity: Option<Duration>) -> Vec<(u64, TleHistory)> {
        self.records
            .into_iter()
            .map(|(norad_id, records)| (norad_id, TleHistory::new(records, final_validity)))
            .collect()
    }
}

fn parse_tle_file(path: &Path) -> Result<Vec<OrbitalRecord>, PredictError> {
    let content = fs::read_to_string(path)?;
    let filename = path.file_name().unwrap_or_default().to_string_lossy().to_string();
    parse_tle_text(&content, &filename)
}

/// Parse every element set in `content`; any invalid set fails the whole text.
pub fn parse_tle_text(content: &str, source: &str) -> Result<Vec<OrbitalRecord>, PredictError> {
    parse_multi_tle(content)
        .into_iter()
        .map(|(name, line1, line2)| {
            OrbitalRecord::from_tle(name, &line1, &line2, source).map_err(|e| {
                PredictError::InvalidTle {
                    file: source.to_string(),
                    message: e.to_string(),
                }
            })
        })
        .collect()
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE, name may carry the "0 " prefix
            let name = lines[i].strip_prefix("0 ").unwrap_or(lines[i]).to_string();
            result.push((Some(name), lines[i + 1].to_string(), lines[i + 2].to_string()));
            i += 3;
        } else {
            i += 1; // Skip unknown line
        }
    }

    result
}
