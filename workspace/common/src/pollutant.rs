use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A tracked water-quality measurement.
///
/// Variant names double as dataset column names, so the serialized form is
/// exactly the column header (`"O2"`, `"NO3"`, ...).
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum Pollutant {
    O2,
    NO3,
    NO2,
    SO4,
    PO4,
    CL,
}

/// The fixed pollutant order. Model outputs are positionally aligned to it.
pub const POLLUTANTS: [Pollutant; 6] = [
    Pollutant::O2,
    Pollutant::NO3,
    Pollutant::NO2,
    Pollutant::SO4,
    Pollutant::PO4,
    Pollutant::CL,
];

impl Pollutant {
    /// Column header used by the dataset file.
    pub fn column(&self) -> &'static str {
        match self {
            Pollutant::O2 => "O2",
            Pollutant::NO3 => "NO3",
            Pollutant::NO2 => "NO2",
            Pollutant::SO4 => "SO4",
            Pollutant::PO4 => "PO4",
            Pollutant::CL => "CL",
        }
    }

    /// First pollutant in list order that is not `self`.
    pub fn first_other(&self) -> Pollutant {
        if *self == Pollutant::O2 {
            Pollutant::NO3
        } else {
            Pollutant::O2
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Pollutant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        POLLUTANTS
            .iter()
            .copied()
            .find(|p| p.column().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown pollutant: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("no3".parse::<Pollutant>().unwrap(), Pollutant::NO3);
        assert_eq!(" Cl ".parse::<Pollutant>().unwrap(), Pollutant::CL);
        assert!("NH4".parse::<Pollutant>().is_err());
    }

    #[test]
    fn test_serializes_as_column_name() {
        let json = serde_json::to_string(&POLLUTANTS).unwrap();
        assert_eq!(json, r#"["O2","NO3","NO2","SO4","PO4","CL"]"#);
    }

    #[test]
    fn test_first_other() {
        assert_eq!(Pollutant::O2.first_other(), Pollutant::NO3);
        assert_eq!(Pollutant::PO4.first_other(), Pollutant::O2);
    }
}
