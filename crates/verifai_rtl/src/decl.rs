//! Declaration extraction: module identity, parameters, and ports.
//!
//! Each extractor is a single regular-expression scan over comment-stripped
//! text. They are best-effort: anything that does not fit the expected shape
//! is skipped rather than reported.
//!
//! **Known limits.** Comma-chained declarations (`input [7:0] a, b;`) yield
//! only the first name. Parameter chains (`localparam A = 0, B = 1;`) yield
//! only the first assignment. Packed ranges whose bounds are not plain
//! decimal literals (`[WIDTH-1:0]`) produce a width-1 port with no bounds;
//! widths are never resolved against extracted parameter values.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{ParamKind, Parameter, Port, PortDirection, SignalClass, UNKNOWN_MODULE};

lazy_static! {
    static ref MODULE_DECL: Regex = Regex::new(r"\bmodule\s+(\w+)").unwrap();
    static ref PARAM_DECL: Regex = Regex::new(
        r"(?i)\b(parameter|localparam)\s+(?:(\w+)\s+)?(\w+)\s*=\s*([^,;)]+)"
    )
    .unwrap();
    static ref PORT_DECL: Regex = Regex::new(
        r"(?i)\b(input|output|inout)\s+(?:(wire|reg|logic|integer)\b)?\s*(signed\b)?\s*(\[\s*([^\[\]:]+?)\s*:\s*([^\[\]:]+?)\s*\])?\s*(\w+)"
    )
    .unwrap();
}

/// Identifiers that can never be port names. A match capturing one of these
/// means the pattern ran across a statement boundary.
const RESERVED_PORT_NAMES: &[&str] = &[
    "input",
    "output",
    "inout",
    "wire",
    "reg",
    "logic",
    "integer",
    "signed",
    "module",
    "endmodule",
];

/// Returns the identifier following the first `module` keyword, or
/// [`UNKNOWN_MODULE`] when there is none.
pub fn extract_module_name(text: &str) -> String {
    MODULE_DECL
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_MODULE.to_string())
}

/// Extracts `parameter`/`localparam` declarations in source order.
///
/// The value is captured verbatim up to the next `,`, `;`, or `)` and trimmed.
pub fn extract_parameters(text: &str) -> Vec<Parameter> {
    PARAM_DECL
        .captures_iter(text)
        .map(|cap| {
            let kind = if cap[1].eq_ignore_ascii_case("localparam") {
                ParamKind::Localparam
            } else {
                ParamKind::Parameter
            };
            Parameter {
                name: cap[3].to_string(),
                value: cap[4].trim().to_string(),
                kind,
                declared_type: cap.get(2).map(|m| m.as_str().to_string()),
            }
        })
        .collect()
}

/// Extracts port declarations in source order.
///
/// Matches `input|output|inout`, an optional class keyword, optional
/// `signed`, an optional `[msb:lsb]` range, and the port name.
pub fn extract_ports(text: &str) -> Vec<Port> {
    let mut ports = Vec::new();

    for cap in PORT_DECL.captures_iter(text) {
        let name = &cap[7];
        if is_reserved(name) {
            tracing::trace!(name, "skipping keyword captured as port name");
            continue;
        }

        let direction = match cap[1].parse::<PortDirection>() {
            Ok(direction) => direction,
            Err(_) => continue,
        };
        let signal_class = cap
            .get(2)
            .and_then(|m| m.as_str().parse::<SignalClass>().ok())
            .unwrap_or_default();

        let (width, msb, lsb) = match (cap.get(5), cap.get(6)) {
            (Some(msb), Some(lsb)) => resolve_width(msb.as_str(), lsb.as_str()),
            _ => (1, None, None),
        };

        ports.push(Port {
            name: name.to_string(),
            direction,
            signal_class,
            is_signed: cap.get(3).is_some(),
            width,
            msb,
            lsb,
        });
    }

    ports
}

/// Computes `(width, msb, lsb)` from range bounds. Non-literal bounds, and
/// ranges whose width does not fit a `u32`, give width 1 and no recorded
/// bounds.
fn resolve_width(msb: &str, lsb: &str) -> (u32, Option<u32>, Option<u32>) {
    let (Ok(msb), Ok(lsb)) = (msb.trim().parse::<u32>(), lsb.trim().parse::<u32>()) else {
        return (1, None, None);
    };
    match msb.abs_diff(lsb).checked_add(1) {
        Some(width) => (width, Some(msb), Some(lsb)),
        None => (1, None, None),
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_PORT_NAMES
        .iter()
        .any(|kw| name.eq_ignore_ascii_case(kw))
}
