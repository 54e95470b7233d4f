use serde::{Deserialize, Serialize};

/// Presentation settings embedded in the result page's portlet script.
///
/// Kept as a free-form JSON object: the portal does not document its keys.
pub type ConfigBlock = serde_json::Map<String, serde_json::Value>;

/// Everything extracted from one portal response.
///
/// This is the only shape produced on the success path. A page carrying a
/// server alert never yields a `LookupResult`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub config: Option<ConfigBlock>,
    pub report: Option<ReportRecord>,
}

/// The shipment report, keyed by the portal's phrase identifiers when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Echo of the RMPD document number.
    #[serde(rename = "rmpdNumber")]
    pub number: Option<String>,
    #[serde(rename = "rmpdCrationDate")]
    pub creation_date: Option<String>,
    #[serde(rename = "rmpdGeoLocatorNumber")]
    pub geolocator_number: Option<String>,
    #[serde(rename = "rmpdStatus")]
    pub status: StatusInfo,
    /// Address assembled from the paragraphs following the address label.
    #[serde(rename = "rmpdAdress")]
    pub address: Option<String>,
    #[serde(rename = "rmpdGoodsCarrierInfo")]
    pub carrier_info: CarrierInfo,
}

/// Current monitoring status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(rename = "rmpdRmpdStatus2")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierInfo {
    #[serde(rename = "rmpdBasicInfo")]
    pub basic_info: BasicInfo,
    #[serde(rename = "rmpdLastGPSPosition")]
    pub last_known_position: GpsPosition,
}

/// Identity of the trader responsible for the goods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(rename = "rmpdTraderName")]
    pub trader_name: Option<String>,
    #[serde(rename = "rmpdTraderIdentityType")]
    pub identity_type: Option<String>,
    #[serde(rename = "rmpdTraderIdentityNumber")]
    pub identity_number: Option<String>,
}

/// Coordinates as rendered by the portal; not parsed into numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpsPosition {
    #[serde(rename = "rmpdLatitude")]
    pub latitude: Option<String>,
    #[serde(rename = "rmpdLongitude")]
    pub longitude: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_with_phrase_keys() {
        let report = ReportRecord {
            number: Some("RMPD1".into()),
            status: StatusInfo {
                status: Some("Active".into()),
            },
            ..Default::default()
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["rmpdNumber"], "RMPD1");
        assert_eq!(value["rmpdCrationDate"], serde_json::Value::Null);
        assert_eq!(value["rmpdStatus"]["rmpdRmpdStatus2"], "Active");
        assert_eq!(value["rmpdAdress"], serde_json::Value::Null);
        assert!(value["rmpdGoodsCarrierInfo"]["rmpdBasicInfo"]
            .as_object()
            .unwrap()
            .contains_key("rmpdTraderName"));
        assert!(value["rmpdGoodsCarrierInfo"]["rmpdLastGPSPosition"]
            .as_object()
            .unwrap()
            .contains_key("rmpdLongitude"));
    }

    #[test]
    fn test_empty_result_serializes_nulls() {
        let json = serde_json::to_string(&LookupResult::default()).unwrap();
        assert_eq!(json, r#"{"config":null,"report":null}"#);
    }
}
