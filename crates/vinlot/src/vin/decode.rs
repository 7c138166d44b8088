//! Offline VIN decoding.
//!
//! Splits a VIN into its WMI, VDS and VIS sections and looks up the model
//! year and manufacturing region from fixed tables. No validation happens
//! here.

use serde::{Deserialize, Serialize};

/// Geographic region encoded by the first WMI character (ISO 3780).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// A-H
    Africa,
    /// J-R
    Asia,
    /// S-Z
    Europe,
    /// 1-5
    NorthAmerica,
    /// 6-7
    Oceania,
    /// 8-9
    SouthAmerica,
}

impl Region {
    /// Region for the first character of a WMI.
    #[must_use]
    pub fn from_wmi_char(c: char) -> Option<Self> {
        match c {
            'A'..='H' => Some(Self::Africa),
            'J'..='R' => Some(Self::Asia),
            'S'..='Z' => Some(Self::Europe),
            '1'..='5' => Some(Self::NorthAmerica),
            '6' | '7' => Some(Self::Oceania),
            '8' | '9' => Some(Self::SouthAmerica),
            _ => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Africa => write!(f, "Africa"),
            Self::Asia => write!(f, "Asia"),
            Self::Europe => write!(f, "Europe"),
            Self::NorthAmerica => write!(f, "North America"),
            Self::Oceania => write!(f, "Oceania"),
            Self::SouthAmerica => write!(f, "South America"),
        }
    }
}

/// Fields extracted from a VIN without any network lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VinInfo {
    /// World Manufacturer Identifier, characters 1-3.
    pub wmi: String,
    /// Vehicle Descriptor Section, characters 4-9.
    pub vds: String,
    /// Vehicle Identifier Section, characters 10-17.
    pub vis: String,
    /// Model year from the 10th character, when it is in the year table.
    pub model_year: Option<u16>,
    /// Assembly plant code, the 11th character.
    pub plant_code: Option<char>,
    /// Production sequence number, characters 12-17.
    pub serial_number: String,
    /// Manufacturing region from the 1st character.
    pub region: Option<Region>,
}

/// Model year for a 10th-position year code.
///
/// Covers the 2010-2024 cycle only.
#[must_use]
pub fn model_year(code: char) -> Option<u16> {
    match code {
        'A' => Some(2010),
        'B' => Some(2011),
        'C' => Some(2012),
        'D' => Some(2013),
        'E' => Some(2014),
        'F' => Some(2015),
        'G' => Some(2016),
        'H' => Some(2017),
        'J' => Some(2018),
        'K' => Some(2019),
        'L' => Some(2020),
        'M' => Some(2021),
        'N' => Some(2022),
        'P' => Some(2023),
        'R' => Some(2024),
        _ => None,
    }
}

/// Decode a VIN into its sections.
///
/// Never fails. Short input yields truncated or empty sections and `None`
/// for fields whose position is missing.
#[must_use]
pub fn decode_local(vin: &str) -> VinInfo {
    let chars: Vec<char> = vin.chars().collect();

    VinInfo {
        wmi: section(&chars, 0, 3),
        vds: section(&chars, 3, 9),
        vis: section(&chars, 9, 17),
        model_year: chars.get(9).copied().and_then(model_year),
        plant_code: chars.get(10).copied(),
        serial_number: section(&chars, 11, 17),
        region: chars.first().copied().and_then(Region::from_wmi_char),
    }
}

fn section(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    chars[start..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_vin() {
        let info = decode_local("1HGCM82633A004352");

        assert_eq!(info.wmi, "1HG");
        assert_eq!(info.vds, "CM8263");
        assert_eq!(info.vis, "3A004352");
        assert_eq!(info.plant_code, Some('A'));
        assert_eq!(info.serial_number, "004352");
        // '3' is outside the 2010-2024 cycle.
        assert_eq!(info.model_year, None);
        assert_eq!(info.region, Some(Region::NorthAmerica));
    }

    #[test]
    fn test_decode_model_year_in_table() {
        let info = decode_local("WVWZZZ1KZAW000001");
        assert_eq!(info.model_year, Some(2010));
        assert_eq!(info.region, Some(Region::Europe));
    }

    #[test]
    fn test_model_year_table() {
        assert_eq!(model_year('A'), Some(2010));
        assert_eq!(model_year('H'), Some(2017));
        assert_eq!(model_year('J'), Some(2018));
        assert_eq!(model_year('P'), Some(2023));
        assert_eq!(model_year('R'), Some(2024));
        assert_eq!(model_year('I'), None);
        assert_eq!(model_year('S'), None);
        assert_eq!(model_year('3'), None);
    }

    #[test]
    fn test_decode_short_input() {
        let info = decode_local("JH4KA");
        assert_eq!(info.wmi, "JH4");
        assert_eq!(info.vds, "KA");
        assert_eq!(info.vis, "");
        assert_eq!(info.model_year, None);
        assert_eq!(info.plant_code, None);
        assert_eq!(info.serial_number, "");
        assert_eq!(info.region, Some(Region::Asia));
    }

    #[test]
    fn test_decode_empty_input() {
        let info = decode_local("");
        assert!(info.wmi.is_empty());
        assert!(info.region.is_none());
    }

    #[test]
    fn test_decode_garbage_does_not_panic() {
        let info = decode_local("ÉÉÉ!!!???ééé#####");
        assert_eq!(info.wmi, "ÉÉÉ");
        assert_eq!(info.plant_code, Some('é'));
        assert!(info.region.is_none());
    }

    #[test]
    fn test_region_display() {
        assert_eq!(Region::NorthAmerica.to_string(), "North America");
        assert_eq!(Region::from_wmi_char('9'), Some(Region::SouthAmerica));
        assert_eq!(Region::from_wmi_char('0'), None);
    }

    #[test]
    fn test_info_serialization() {
        let info = decode_local("1HGCM82633A004352");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["wmi"], "1HG");
        assert_eq!(json["plant_code"], "A");
        assert_eq!(json["model_year"], serde_json::Value::Null);
        assert_eq!(json["region"], "north_america");
    }
}
