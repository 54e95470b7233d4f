use crate::text::TextTree;
use scraper::{Html, Node, Selector};
use std::ops::Deref;

/// Look for a server-rendered danger banner and return its message.
///
/// The banner reads `<strong>Error:</strong> actual message`; the message is
/// everything after the emphasized label. A banner without a label yields
/// its whole text.
pub(crate) fn detect_alert(document: &Html) -> Option<String> {
    let alert_sel = Selector::parse("div.alert.alert-danger").expect("valid selector");
    let alert = document.select(&alert_sel).next()?;

    let label_sel = Selector::parse("strong, b").expect("valid selector");
    let message: String = match alert.select(&label_sel).next() {
        Some(label) => label
            .next_siblings()
            .map(|sibling| match sibling.value() {
                Node::Text(t) => t.deref().to_string(),
                Node::Element(_) => sibling.text_content(),
                _ => String::new(),
            })
            .collect(),
        None => {
            tracing::debug!("Alert banner has no emphasized label");
            alert.text().collect()
        }
    };

    Some(message.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(html: &str) -> Option<String> {
        detect_alert(&Html::parse_document(html))
    }

    #[test]
    fn test_message_follows_label() {
        let html = r#"<div class="alert alert-danger" role="alert">
            <strong>Error!</strong> No document with number <em>RMPD1</em> was found.
        </div>"#;
        assert_eq!(
            alert(html).as_deref(),
            Some("No document with number RMPD1 was found.")
        );
    }

    #[test]
    fn test_label_text_excluded() {
        let html = r#"<div class="alert alert-danger"><strong>X</strong> Y Z </div>"#;
        assert_eq!(alert(html).as_deref(), Some("Y Z"));
    }

    #[test]
    fn test_requires_both_classes() {
        let html = r#"<div class="alert alert-info"><strong>Note</strong> all fine</div>
            <div class="alert-danger"><strong>Hm</strong> not a banner</div>"#;
        assert_eq!(alert(html), None);
    }

    #[test]
    fn test_banner_without_label_uses_whole_text() {
        let html = r#"<div class="alert alert-danger">  Service unavailable </div>"#;
        assert_eq!(alert(html).as_deref(), Some("Service unavailable"));
    }

    #[test]
    fn test_nested_label_only_its_siblings() {
        let html = r#"<div class="alert alert-danger">
            <p><strong>Error:</strong> wrong truck number</p>
            <p>Ignored footer</p>
        </div>"#;
        assert_eq!(alert(html).as_deref(), Some("wrong truck number"));
    }
}
