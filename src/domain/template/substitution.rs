//! Variable substitution engine for templates
//!
//! Markers use the `{{name}}` syntax. Only names declared on the template are
//! recognised; everything else is copied through untouched. Replacement values
//! are emitted verbatim and never re-scanned.

use std::collections::HashMap;

use super::types::is_valid_variable_name;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Render `body`, replacing declared markers with their supplied values.
///
/// A declared marker with no value (or an empty one) renders as an empty
/// string. Undeclared markers are left byte-identical.
pub fn substitute(body: &str, declared: &[String], values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(body.len());
    let mut scanner = MarkerScanner::new(body);
    let mut copied = 0;
    let mut cursor = 0;

    while let Some(offset) = body[cursor..].find(OPEN) {
        let start = cursor + offset;

        match scanner.candidate_at(start) {
            Candidate::Marker { name, end } if declared.iter().any(|d| d == name) => {
                out.push_str(&body[copied..start]);
                if let Some(value) = values.get(name) {
                    out.push_str(value);
                }
                copied = end;
                cursor = end;
            }
            Candidate::Exhausted => break,
            // Rescan from the next byte, so that `{{{name}}}` still resolves
            // the inner marker.
            _ => cursor = start + 1,
        }
    }

    out.push_str(&body[copied..]);
    out
}

/// Marker names referenced in `body`, in first-appearance order, without duplicates.
///
/// Any `{{...}}` whose inner text is a syntactically valid placeholder name is
/// reported, declared or not.
pub fn placeholders(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut scanner = MarkerScanner::new(body);
    let mut cursor = 0;

    while let Some(offset) = body[cursor..].find(OPEN) {
        let start = cursor + offset;

        match scanner.candidate_at(start) {
            Candidate::Marker { name, end } if is_valid_variable_name(name) => {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
                cursor = end;
            }
            Candidate::Exhausted => break,
            _ => cursor = start + 1,
        }
    }

    names
}

/// What a `{{` in the body turns out to be
enum Candidate<'a> {
    /// `{{name}}` with no nested `{{`; `end` is the offset just past `}}`
    Marker { name: &'a str, end: usize },
    /// Plain text
    Literal,
    /// No `}}` follows, so nothing from here on is a marker
    Exhausted,
}

/// First occurrence of a delimiter at or after a position, remembered
/// between calls.
struct Lookahead {
    needle: &'static str,
    from: usize,
    found: Option<usize>,
}

impl Lookahead {
    fn new(body: &str, needle: &'static str) -> Self {
        Self {
            needle,
            from: 0,
            found: body.find(needle),
        }
    }

    /// Positions passed in never decrease, so a fresh search always starts
    /// past the previous hit and every byte is searched at most once.
    fn first_from(&mut self, body: &str, at: usize) -> Option<usize> {
        let still_valid = at >= self.from && !matches!(self.found, Some(found) if found < at);
        if !still_valid {
            self.from = at;
            self.found = body[at..].find(self.needle).map(|i| at + i);
        }
        self.found
    }
}

/// Classifies `{{` positions in one forward pass over the body
struct MarkerScanner<'a> {
    body: &'a str,
    opens: Lookahead,
    closes: Lookahead,
}

impl<'a> MarkerScanner<'a> {
    fn new(body: &'a str) -> Self {
        Self {
            body,
            opens: Lookahead::new(body, OPEN),
            closes: Lookahead::new(body, CLOSE),
        }
    }

    /// Classify the `{{` starting at `start`; calls must use increasing offsets.
    fn candidate_at(&mut self, start: usize) -> Candidate<'a> {
        let body = self.body;
        let inner = start + OPEN.len();

        let Some(close) = self.closes.first_from(body, inner) else {
            return Candidate::Exhausted;
        };

        // A nested `{{` before the closing braces means this is not a marker
        if let Some(open) = self.opens.first_from(body, inner) {
            if open + OPEN.len() <= close {
                return Candidate::Literal;
            }
        }

        Candidate::Marker {
            name: &body[inner..close],
            end: close + CLOSE.len(),
        }
    }
}
