//! Canonical XML key exchange format
//!
//! ```text
//! <ElGamalKeyValue><P>..</P><G>..</G><Y>..</Y><Padding>..</Padding><X>..</X></ElGamalKeyValue>
//! ```
//!
//! Values are standard base64 of minimal big-endian magnitudes. `<X>` is only
//! written for snapshots that carry the private exponent. On parse, a missing
//! `<P>`, `<G>`, `<Y>` or `<X>` element reads as an empty value; validation on
//! import decides whether the result is usable. Whitespace inside a base64
//! value is ignored.
//!
//! Values with leading zero bytes parse, but keys exported by an engine always
//! use the minimal encoding, so such input is not reproduced byte for byte.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{ElGamalError, Result};
use crate::params::ElGamalParameters;

const ROOT: &str = "ElGamalKeyValue";

/// Render `parameters` in the canonical format
pub fn to_xml_string(parameters: &ElGamalParameters) -> String {
    let mut out = String::new();

    out.push_str("<ElGamalKeyValue>");
    push_element(&mut out, "P", &STANDARD.encode(&parameters.p));
    push_element(&mut out, "G", &STANDARD.encode(&parameters.g));
    push_element(&mut out, "Y", &STANDARD.encode(&parameters.y));
    push_element(&mut out, "Padding", parameters.padding.name());

    if parameters.has_private_key() {
        let x = Zeroizing::new(STANDARD.encode(parameters.x.as_slice()));
        push_element(&mut out, "X", &x);
    }

    out.push_str("</ElGamalKeyValue>");
    out
}

fn push_element(out: &mut String, name: &str, value: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(value);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Parse the canonical format into an unvalidated snapshot
pub fn from_xml_string(xml: &str) -> Result<ElGamalParameters> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ElGamalError::InvalidKey(format!("Malformed key XML: {}", e)))?;

    let root = doc.root_element();
    if !root.has_tag_name(ROOT) {
        return Err(ElGamalError::InvalidKey(format!(
            "Expected <{}> root element, found <{}>",
            ROOT,
            root.tag_name().name()
        )));
    }

    let parameters = ElGamalParameters {
        p: decode_element(root, "P")?,
        g: decode_element(root, "G")?,
        y: decode_element(root, "Y")?,
        x: Zeroizing::new(decode_element(root, "X")?),
        padding: child_text(root, "Padding").parse()?,
    };

    if parameters.is_degenerate() {
        warn!("key XML has an empty modulus");
    }
    debug!(
        "parsed key XML (private: {}, padding: {})",
        parameters.has_private_key(),
        parameters.padding
    );

    Ok(parameters)
}

/// Trimmed text of the first child element called `name`, or "" if absent
fn child_text<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> &'a str {
    node.children()
        .find(|child| child.is_element() && child.has_tag_name(name))
        .and_then(|child| child.text())
        .map(str::trim)
        .unwrap_or("")
}

fn decode_element(node: roxmltree::Node<'_, '_>, name: &str) -> Result<Vec<u8>> {
    let compact: Zeroizing<String> = Zeroizing::new(
        child_text(node, name)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect(),
    );

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ElGamalError::InvalidKey(format!("Invalid base64 in <{}>: {}", name, e)))
}
