//! Parsing markup fragments into an [`ArenaDom`].
//!
//! Two front ends share the arena: a lenient one (html5ever, for pasted
//! editor content) and a strict one (quick-xml, for markup that this crate
//! produced and expects to read back verbatim).

use std::borrow::Cow;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use quick_xml::Reader;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};

use super::Document;
use super::arena::{ArenaDom, Attribute, html_qname};
use super::tree_sink::ArenaSink;
use crate::error::{Error, Result};

/// Tag of the synthesized element that holds a parsed fragment.
pub const FRAGMENT_ROOT: &str = "body";

/// Parse a fragment leniently, the way a browser would.
///
/// The fragment is placed inside a synthesized `<html><body>` so that
/// content such as `<style>` or bare text stays in document order.
pub fn parse_html(content: &str) -> Document {
    let wrapped = format!("<html><head></head><body>{content}</body></html>");
    let sink = ArenaSink::new();
    let mut dom = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes())
        .into_dom();

    let root = match dom.find_by_tag(FRAGMENT_ROOT) {
        Some(body) => body,
        None => {
            let body = dom.create_tag(FRAGMENT_ROOT);
            let document = dom.document();
            dom.append(document, body);
            body
        }
    };

    Document { dom, root }
}

/// Parse a fragment strictly as well-formed XML.
///
/// HTML named entities (`&nbsp;`, `&eacute;`, ...) are accepted in addition
/// to the XML ones. Anything that is not well formed is rejected with
/// [`Error::InvalidMarkup`].
pub fn parse_xml(content: &str) -> Result<Document> {
    let mut dom = ArenaDom::new();
    let root = dom.create_tag(FRAGMENT_ROOT);
    let document = dom.document();
    dom.append(document, root);

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = true;

    let mut stack = vec![root];

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::InvalidMarkup(format!(
                "markup is not well formed at byte {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                let element = create_element(&mut dom, &e)?;
                let parent = current(&stack, root);
                dom.append(parent, element);
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = create_element(&mut dom, &e)?;
                let parent = current(&stack, root);
                dom.append(parent, element);
            }
            Event::End(e) => {
                if stack.len() <= 1 {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(Error::InvalidMarkup(format!(
                        "closing tag </{name}> has no matching opening tag"
                    )));
                }
                stack.pop();
            }
            Event::Text(e) => {
                let raw = decode_utf8(&e)?;
                let text = unescape(raw)?;
                dom.append_text(current(&stack, root), &text);
            }
            Event::CData(e) => {
                let text = decode_utf8(&e)?;
                dom.append_text(current(&stack, root), text);
            }
            Event::GeneralRef(e) => {
                let name = decode_utf8(&e)?;
                let text = resolve_reference(name)?;
                dom.append_text(current(&stack, root), &text);
            }
            Event::Eof => break,
            // Comments, processing instructions and declarations carry no content.
            _ => {}
        }
    }

    if stack.len() > 1 {
        let unclosed = dom.tag(current(&stack, root)).unwrap_or("?").to_string();
        return Err(Error::InvalidMarkup(format!(
            "element <{unclosed}> is never closed"
        )));
    }

    Ok(Document { dom, root })
}

fn current(stack: &[super::ArenaNodeId], root: super::ArenaNodeId) -> super::ArenaNodeId {
    stack.last().copied().unwrap_or(root)
}

fn create_element(dom: &mut ArenaDom, start: &BytesStart<'_>) -> Result<super::ArenaNodeId> {
    let tag = decode_utf8(start.name().as_ref())?.to_ascii_lowercase();

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::InvalidMarkup(format!("bad attribute on <{tag}>: {e}")))?;
        let key = decode_utf8(attr.key.as_ref())?.to_ascii_lowercase();
        let raw = decode_utf8(&attr.value)?;
        let value = unescape(raw)?;
        attrs.push(Attribute::new(&key, value.into_owned()));
    }

    Ok(dom.create_element(html_qname(&tag), attrs))
}

fn decode_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| Error::InvalidMarkup(format!("markup is not valid UTF-8: {e}")))
}

fn unescape(raw: &str) -> Result<Cow<'_, str>> {
    unescape_with(raw, resolve_html5_entity)
        .map_err(|e| Error::InvalidMarkup(format!("bad character reference: {e}")))
}

/// Resolve the body of a `&...;` reference (without the delimiters).
fn resolve_reference(name: &str) -> Result<Cow<'static, str>> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        return code
            .and_then(char::from_u32)
            .map(|c| Cow::Owned(c.to_string()))
            .ok_or_else(|| Error::InvalidMarkup(format!("bad character reference &{name};")));
    }
    resolve_html5_entity(name)
        .map(Cow::Borrowed)
        .ok_or_else(|| Error::InvalidMarkup(format!("unknown entity &{name};")))
}
