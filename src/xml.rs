//! Navigable XML document tree.
//!
//! Responses are small, so the whole document is read into an owned tree of [`XmlElement`]s.
//! CDATA sections are folded into the surrounding element text. Text is kept as written; only
//! whitespace used to indent child elements is dropped.

use crate::error::{Result, VoteSmartError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

/// A single XML element with its attributes, text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    /// Qualified element name
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Concatenated text and CDATA content, untrimmed
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Element text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First child element named `name`
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements named `name`
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text of the first child named `name`
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlElement::text)
    }

    /// Follow a dotted path of child names, e.g. `"candidate.firstName"`.
    ///
    /// The path is relative to this element, so the root name is not part of it.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// Check if the element has neither text nor children
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }
}

/// Parse a complete XML document into its root element.
pub fn parse_xml(input: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                ensure_single_root(&root, &start)?;
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&root, &start)?;
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| VoteSmartError::malformed("closing tag without element"))?;
                // Indentation between child elements is not content
                if !element.children.is_empty() && element.text.trim().is_empty() {
                    element.text.clear();
                }
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)
                    .map_err(|e| VoteSmartError::malformed(format!("invalid CDATA: {}", e)))?;
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(VoteSmartError::malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| VoteSmartError::malformed("document has no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = decode_name(start.name().as_ref())?;
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = decode_name(attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn decode_name(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| VoteSmartError::malformed(format!("invalid element name: {}", e)))
}

fn ensure_single_root(root: &Option<XmlElement>, start: &BytesStart<'_>) -> Result<()> {
    if root.is_some() {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        return Err(VoteSmartError::malformed(format!(
            "unexpected element <{}> after the root element",
            name
        )));
    }
    Ok(())
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(VoteSmartError::malformed("text outside the root element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bio>
  <generalInfo>
    <title>Project Vote Smart - Bio - Jane Doe</title>
    <linkBack>http://votesmart.org/bio.php?can_id=9026</linkBack>
  </generalInfo>
  <candidate>
    <candidateId>9026</candidateId>
    <firstName>Jane</firstName>
    <lastName>Doe &amp; Co</lastName>
    <photo><![CDATA[http://votesmart.org/photo.jpg]]></photo>
  </candidate>
  <office type="Senate" current="true"/>
</bio>"#;

    #[test]
    fn test_parse_bio_document() {
        let root = parse_xml(BIO).unwrap();
        assert_eq!(root.name, "bio");
        assert_eq!(root.children.len(), 3);

        assert_eq!(
            root.find("candidate.firstName").map(XmlElement::text),
            Some("Jane")
        );
        assert_eq!(
            root.child("candidate").and_then(|c| c.child_text("lastName")),
            Some("Doe & Co")
        );
        assert_eq!(
            root.find("candidate.photo").map(XmlElement::text),
            Some("http://votesmart.org/photo.jpg")
        );

        let office = root.child("office").unwrap();
        assert_eq!(office.attr("type"), Some("Senate"));
        assert_eq!(office.attr("current"), Some("true"));
        assert!(office.is_empty());

        assert!(root.find("candidate.middleName").is_none());
        assert_eq!(root.find("").map(|e| e.name.as_str()), Some("bio"));
    }

    #[test]
    fn test_text_kept_as_written() {
        let root = parse_xml(
            "<bio>\n  <candidate>\n    <firstName>  Jane  </firstName>\n    \
             <suffix> </suffix>\n    <photo> <![CDATA[ a.jpg ]]></photo>\n  </candidate>\n</bio>\n",
        )
        .unwrap();

        assert_eq!(root.text(), "");
        assert_eq!(root.child("candidate").unwrap().text(), "");
        assert_eq!(root.find("candidate.firstName").unwrap().text(), "  Jane  ");
        assert_eq!(root.find("candidate.suffix").unwrap().text(), " ");
        assert_eq!(root.find("candidate.photo").unwrap().text(), "  a.jpg ");
    }

    #[test]
    fn test_repeated_children() {
        let root =
            parse_xml("<list><item>a</item><item>b</item><other/><item>c</item></list>").unwrap();
        let items: Vec<&str> = root.children_named("item").map(XmlElement::text).collect();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_malformed_documents() {
        for bad in [
            "",
            "just text",
            "<a><b></a>",
            "<a>",
            "<a></a><b></b>",
            "<a attr=\"unterminated></a>",
        ] {
            let err = parse_xml(bad).unwrap_err();
            assert!(err.is_malformed_response(), "{:?} gave {:?}", bad, err);
        }
    }
}
