use serde::{Deserialize, Serialize};

/// Amenity category recognized by the nearby-care lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    Pharmacy,
    Hospital,
}

impl std::fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pharmacy => write!(f, "pharmacy"),
            Self::Hospital => write!(f, "hospital"),
        }
    }
}

impl std::str::FromStr for PlaceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pharmacy" => Ok(Self::Pharmacy),
            "hospital" => Ok(Self::Hospital),
            _ => Err(()),
        }
    }
}

/// A pharmacy or hospital near the caller, with display-ready fields.
///
/// Missing upstream tags are filled with fixed placeholders so the
/// presentation layer never deals with absent values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub id: String,
    pub name: String,
    pub kind: PlaceKind,
    pub address: String,
    pub phone: String,
    /// Formatted great-circle distance from the caller, e.g. "1.2 km".
    pub distance: String,
    pub hours: String,
    pub lat: f64,
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_from_str() {
        assert_eq!("pharmacy".parse::<PlaceKind>(), Ok(PlaceKind::Pharmacy));
        assert_eq!("hospital".parse::<PlaceKind>(), Ok(PlaceKind::Hospital));
        assert!("clinic".parse::<PlaceKind>().is_err());
    }

    #[test]
    fn kind_display_matches_wire_form() {
        assert_eq!(PlaceKind::Pharmacy.to_string(), "pharmacy");
        assert_eq!(PlaceKind::Hospital.to_string(), "hospital");
    }
}
