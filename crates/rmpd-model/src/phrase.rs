//! Phrase identifiers used by the portal to tag report fragments.
//!
//! The spellings (`rmpdCrationDate`, `rmpdAdress`) are the portal's own and
//! must match the markup exactly.

/// Attribute carrying the phrase identifier on tagged elements.
pub const DATA_PHRASE_ATTR: &str = "data-phrase-id";

pub const NUMBER: &str = "rmpdNumber";
pub const CREATION_DATE: &str = "rmpdCrationDate";
pub const GEOLOCATOR_NUMBER: &str = "rmpdGeoLocatorNumber";

pub const STATUS: &str = "rmpdRmpdStatus2";

pub const ADDRESS: &str = "rmpdAdress";

pub const TRADER_NAME: &str = "rmpdTraderName";
pub const TRADER_IDENTITY_TYPE: &str = "rmpdTraderIdentityType";
pub const TRADER_IDENTITY_NUMBER: &str = "rmpdTraderIdentityNumber";

pub const LATITUDE: &str = "rmpdLatitude";
pub const LONGITUDE: &str = "rmpdLongitude";

/// Top-level scalar fields, in report order.
pub const REPORT_FIELDS: [&str; 3] = [NUMBER, CREATION_DATE, GEOLOCATOR_NUMBER];

pub const STATUS_FIELDS: [&str; 1] = [STATUS];

pub const BASIC_INFO_FIELDS: [&str; 3] =
    [TRADER_NAME, TRADER_IDENTITY_TYPE, TRADER_IDENTITY_NUMBER];

pub const LAST_POSITION_FIELDS: [&str; 2] = [LATITUDE, LONGITUDE];
