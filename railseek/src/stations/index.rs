//! Station index.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::domain::InputError;

use super::error::StationError;

/// Bundled station table, in the upstream `station_name.js` record
/// format.
const BUNDLED_STATIONS: &str = include_str!("../../data/stations.txt");

/// Positions within one `|`-separated station record.
const FIELD_NAME: usize = 1;
const FIELD_CODE: usize = 2;
const FIELD_CITY: usize = 7;

/// One station: display name, telecode and the city it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    pub code: String,
    pub city: String,
}

/// Bidirectional station lookup with city grouping.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    stations: Vec<Station>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
    by_city: HashMap<String, Vec<usize>>,
}

impl StationIndex {
    /// Parse the upstream station table format: `@`-separated records
    /// of `|`-separated fields, display name at index 1, telecode at
    /// index 2, city at index 7. Malformed records are skipped.
    pub fn parse(text: &str) -> Self {
        let mut index = StationIndex::default();

        for record in text.split('@') {
            let fields: Vec<&str> = record.split('|').collect();
            if fields.len() <= FIELD_CITY {
                continue;
            }
            let name = fields[FIELD_NAME].trim();
            let code = fields[FIELD_CODE].trim();
            let city = fields[FIELD_CITY].trim();
            if name.is_empty() || code.is_empty() {
                continue;
            }

            let idx = index.stations.len();
            index.stations.push(Station {
                name: name.to_string(),
                code: code.to_string(),
                city: city.to_string(),
            });
            index.by_name.insert(name.to_string(), idx);
            index.by_code.insert(code.to_string(), idx);
            if !city.is_empty() {
                index.by_city.entry(city.to_string()).or_default().push(idx);
            }
        }

        debug!(stations = index.stations.len(), "parsed station table");
        index
    }

    /// Load a station table from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StationError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::parse(&text);
        if index.is_empty() {
            return Err(StationError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(index)
    }

    /// The bundled default table.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_STATIONS)
    }

    /// Number of stations in the index.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// True iff the index holds no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Telecode for an exact station name.
    pub fn code_of(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&i| self.stations[i].code.as_str())
    }

    /// Display name for a telecode.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.by_code
            .get(code)
            .map(|&i| self.stations[i].name.as_str())
    }

    /// All stations in the same city as `name`.
    ///
    /// `name` may be a station name (grouping follows its city) or a
    /// bare city name. Unknown names yield an empty group.
    pub fn city_group(&self, name: &str) -> Vec<&Station> {
        let city = match self.by_name.get(name) {
            Some(&i) => self.stations[i].city.as_str(),
            None => name,
        };

        self.by_city
            .get(city)
            .map(|members| members.iter().map(|&i| &self.stations[i]).collect())
            .unwrap_or_default()
    }

    /// Resolve a user-supplied station name to the telecode set to
    /// query.
    ///
    /// With `same_city` the whole city group is returned; otherwise
    /// only the exact station's code. Fails fast on names that resolve
    /// to nothing.
    pub fn resolve_codes(&self, name: &str, same_city: bool) -> Result<Vec<String>, InputError> {
        if !same_city {
            return match self.code_of(name) {
                Some(code) => Ok(vec![code.to_string()]),
                None => Err(InputError::UnknownStation(name.to_string())),
            };
        }

        let group = self.city_group(name);
        if group.is_empty() {
            return Err(InputError::UnknownStation(name.to_string()));
        }
        Ok(group.iter().map(|s| s.code.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "@bjb|北京北|VAP|beijingbei|bjb|0|0001|北京|||\
@bjn|北京南|VNP|beijingnan|bjn|1|0002|北京|||\
@sha|上海|SHH|shanghai|sh|2|0003|上海|||\
@shq|上海虹桥|AOH|shanghaihongqiao|shhq|3|0004|上海|||";

    #[test]
    fn parse_sample() {
        let index = StationIndex::parse(SAMPLE);
        assert_eq!(index.len(), 4);
        assert_eq!(index.code_of("北京南"), Some("VNP"));
        assert_eq!(index.name_of("AOH"), Some("上海虹桥"));
        assert_eq!(index.code_of("nowhere"), None);
        assert_eq!(index.name_of("XXX"), None);
    }

    #[test]
    fn parse_skips_malformed_records() {
        let text = "@bad|record@bjb|北京北|VAP|beijingbei|bjb|0|0001|北京|||@||||||||";
        let index = StationIndex::parse(text);
        assert_eq!(index.len(), 1);
        assert_eq!(index.code_of("北京北"), Some("VAP"));
    }

    #[test]
    fn city_group_by_station_name() {
        let index = StationIndex::parse(SAMPLE);
        let group = index.city_group("北京南");
        let names: Vec<&str> = group.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["北京北", "北京南"]);
    }

    #[test]
    fn city_group_by_city_name() {
        let index = StationIndex::parse(SAMPLE);
        // 上海 is both a station and a city; grouping must cover the city.
        let group = index.city_group("上海");
        let names: Vec<&str> = group.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["上海", "上海虹桥"]);
    }

    #[test]
    fn resolve_codes_exact() {
        let index = StationIndex::parse(SAMPLE);
        assert_eq!(
            index.resolve_codes("北京南", false).unwrap(),
            vec!["VNP".to_string()]
        );
        assert_eq!(
            index.resolve_codes("幽灵站", false),
            Err(InputError::UnknownStation("幽灵站".into()))
        );
    }

    #[test]
    fn resolve_codes_same_city() {
        let index = StationIndex::parse(SAMPLE);
        assert_eq!(
            index.resolve_codes("北京南", true).unwrap(),
            vec!["VAP".to_string(), "VNP".to_string()]
        );
        assert!(index.resolve_codes("幽灵站", true).is_err());
    }

    #[test]
    fn bundled_table_loads() {
        let index = StationIndex::bundled();
        assert!(!index.is_empty());
        assert_eq!(index.code_of("北京南"), Some("VNP"));
        assert_eq!(index.name_of("AOH"), Some("上海虹桥"));
        assert!(index.city_group("北京").len() >= 2);
    }

    #[test]
    fn from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let index = StationIndex::from_file(file.path()).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index.code_of("上海"), Some("SHH"));
    }

    #[test]
    fn from_file_missing() {
        let err = StationIndex::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, StationError::Read { .. }));
    }

    #[test]
    fn from_file_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"no station records here").unwrap();

        let err = StationIndex::from_file(file.path()).unwrap_err();
        assert!(matches!(err, StationError::Empty { .. }));
    }
}
