use crate::text::{following_nodes, normalize, resolve_text};
use rmpd_model::phrase::{self, DATA_PHRASE_ATTR};
use rmpd_model::{BasicInfo, CarrierInfo, GpsPosition, ReportRecord, StatusInfo};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Marker class of the element holding the rendered report.
pub const REPORT_CONTAINER: &str = "div.rmpd-xslt";

/// Extract the report, or `None` when the page has no report container.
pub(crate) fn extract_report(document: &Html) -> Option<ReportRecord> {
    let container_sel = Selector::parse(REPORT_CONTAINER).expect("valid selector");
    let container = document.select(&container_sel).next()?;

    let mut fields = PhraseFields::extract(
        container,
        phrase::REPORT_FIELDS
            .iter()
            .chain(&phrase::STATUS_FIELDS)
            .chain(&phrase::BASIC_INFO_FIELDS)
            .chain(&phrase::LAST_POSITION_FIELDS),
    );

    let report = ReportRecord {
        number: fields.take(phrase::NUMBER),
        creation_date: fields.take(phrase::CREATION_DATE),
        geolocator_number: fields.take(phrase::GEOLOCATOR_NUMBER),
        status: StatusInfo {
            status: fields.take(phrase::STATUS),
        },
        address: extract_address(document),
        carrier_info: CarrierInfo {
            basic_info: BasicInfo {
                trader_name: fields.take(phrase::TRADER_NAME),
                identity_type: fields.take(phrase::TRADER_IDENTITY_TYPE),
                identity_number: fields.take(phrase::TRADER_IDENTITY_NUMBER),
            },
            last_known_position: GpsPosition {
                latitude: fields.take(phrase::LATITUDE),
                longitude: fields.take(phrase::LONGITUDE),
            },
        },
    };

    Some(report)
}

/// Resolved text for a set of phrase identifiers within one container.
struct PhraseFields {
    values: HashMap<&'static str, Option<String>>,
}

impl PhraseFields {
    fn extract<'i>(container: ElementRef<'_>, ids: impl Iterator<Item = &'i &'static str>) -> Self {
        let values = ids
            .map(|&id| {
                let value = find_phrase(container, id).and_then(|el| resolve_text(*el));
                if value.is_none() {
                    tracing::debug!(phrase_id = id, "Field not found");
                }
                (id, value)
            })
            .collect();
        Self { values }
    }

    fn take(&mut self, id: &str) -> Option<String> {
        self.values.remove(id).flatten()
    }
}

fn phrase_selector(id: &str) -> Selector {
    Selector::parse(&format!(r#"[{DATA_PHRASE_ATTR}="{id}"]"#)).expect("valid selector")
}

fn find_phrase<'a>(container: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    container.select(&phrase_selector(id)).next()
}

/// Assemble the address from the `<p>` elements following its label.
///
/// Collection stops at the first paragraph tagged with a phrase identifier,
/// which starts the next field. Blank paragraphs are skipped so they do not
/// leave double spaces in the joined address. A label followed by no text
/// yields an empty string; only a missing label yields `None`.
fn extract_address(document: &Html) -> Option<String> {
    let anchor = document.select(&phrase_selector(phrase::ADDRESS)).next()?;

    let mut parts = Vec::new();
    for p in following_nodes(*anchor).filter_map(ElementRef::wrap) {
        if p.value().name() != "p" {
            continue;
        }
        if p.value().attr(DATA_PHRASE_ATTR).is_some() {
            break;
        }
        let text = normalize(&p.text().collect::<String>());
        if !text.is_empty() {
            parts.push(text);
        }
    }

    Some(parts.join(" "))
}
