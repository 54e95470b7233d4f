use serde::{Deserialize, Serialize};

/// The three identifiers a shipment lookup is keyed by.
///
/// Values are opaque to this system: no format validation is performed
/// beyond what the portal itself does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// RMPD document number (e.g., "RMPD25000000000001").
    pub document_number: String,
    /// Truck registration plate.
    pub truck_number: String,
    /// Geolocator device identifier.
    pub geolocator_number: String,
}

impl LookupRequest {
    pub fn new(
        document_number: impl Into<String>,
        truck_number: impl Into<String>,
        geolocator_number: impl Into<String>,
    ) -> Self {
        Self {
            document_number: document_number.into(),
            truck_number: truck_number.into(),
            geolocator_number: geolocator_number.into(),
        }
    }

    /// Build a request only if all three identifiers are present and non-blank.
    pub fn from_parts(
        document_number: Option<String>,
        truck_number: Option<String>,
        geolocator_number: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Self {
            document_number: present(document_number)?,
            truck_number: present(truck_number)?,
            geolocator_number: present(geolocator_number)?,
        })
    }
}
