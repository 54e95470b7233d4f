// Field text resolution.
//
// The portal renders a field's value in one of three places: on the tagged
// element itself, in a text node somewhere after it, or nested below it.
// `resolve_text` tries them in that order over any tree implementing
// `TextTree`, so the lookup logic does not depend on a particular HTML parser.

use ego_tree::NodeRef;
use rmpd_model::phrase::DATA_PHRASE_ATTR;
use scraper::Node;
use std::iter;
use std::ops::Deref;

/// The minimal tree capability needed to resolve a field's text.
pub trait TextTree<'a>: Copy {
    /// Concatenated text of this node and all of its descendants.
    fn text_content(self) -> String;

    /// Every text node after this node's start, in document order.
    ///
    /// Includes the node's own descendants, then everything that follows it.
    fn following_texts(self) -> Box<dyn Iterator<Item = &'a str> + 'a>;

    /// First child that carries non-whitespace text, if any.
    fn first_text_bearing_child(self) -> Option<Self>;

    /// `Some` with the raw text when this node is a bare text node.
    fn as_text(self) -> Option<&'a str>;

    /// Whether this node is tagged with a phrase identifier of its own.
    fn is_phrase_tagged(self) -> bool;
}

/// Resolve the displayed text of a phrase-tagged node.
///
/// First non-empty result wins: own text, then the first following text node
/// with content, then a descent into nested children. Non-breaking spaces
/// become ordinary spaces and the result is trimmed; an empty result is `None`.
pub fn resolve_text<'a, T: TextTree<'a>>(node: T) -> Option<String> {
    non_empty(&node.text_content())
        .or_else(|| node.following_texts().find_map(non_empty))
        .or_else(|| nested_text(node))
}

/// Descend through first text-bearing children until a text node is reached.
///
/// Stops with `None` on a child tagged with its own phrase identifier: that
/// text belongs to a different field.
fn nested_text<'a, T: TextTree<'a>>(node: T) -> Option<String> {
    let child = node.first_text_bearing_child()?;
    if child.is_phrase_tagged() {
        return None;
    }
    match child.as_text() {
        Some(text) => non_empty(text),
        None => nested_text(child),
    }
}

/// Replace NBSP with a plain space and trim.
pub fn normalize(text: &str) -> String {
    text.replace('\u{a0}', " ").trim().to_string()
}

fn non_empty(text: &str) -> Option<String> {
    let normalized = normalize(text);
    (!normalized.is_empty()).then_some(normalized)
}

/// Nodes after `node`'s start tag in document order, descendants first.
pub(crate) fn following_nodes<'a>(
    node: NodeRef<'a, Node>,
) -> impl Iterator<Item = NodeRef<'a, Node>> + 'a {
    node.descendants().skip(1).chain(
        iter::successors(Some(node), |n| n.parent())
            .flat_map(|n| n.next_siblings())
            .flat_map(|n| n.descendants()),
    )
}

impl<'a> TextTree<'a> for NodeRef<'a, Node> {
    fn text_content(self) -> String {
        self.descendants()
            .filter_map(|n| match n.value() {
                Node::Text(t) => Some(t.deref()),
                _ => None,
            })
            .collect()
    }

    fn following_texts(self) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(following_nodes(self).filter_map(|n| match n.value() {
            Node::Text(t) => Some(t.deref()),
            _ => None,
        }))
    }

    fn first_text_bearing_child(self) -> Option<Self> {
        self.children().find(|c| match c.value() {
            Node::Text(t) => !t.trim().is_empty(),
            Node::Element(_) => !c.text_content().trim().is_empty(),
            _ => false,
        })
    }

    fn as_text(self) -> Option<&'a str> {
        match self.value() {
            Node::Text(t) => Some(t.deref()),
            _ => None,
        }
    }

    fn is_phrase_tagged(self) -> bool {
        match self.value() {
            Node::Element(elem) => elem.attr(DATA_PHRASE_ATTR).is_some(),
            _ => false,
        }
    }
}
