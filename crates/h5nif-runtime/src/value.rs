//! Host term representation
//!
//! The host runtime hands arguments to native functions as dynamically typed
//! terms and expects a term back. `Term` is the in-process model of those
//! values: atoms, integers, floats, strings, tuples and lists.
//!
//! Every native function answers with one of three shapes:
//! - `ok` for a successful operation with no payload
//! - `{ok, Value}` for a successful operation with a payload
//! - `{error, "message"}` for any failure

use ordered_float::OrderedFloat;
use std::fmt;

/// Atom returned for success
pub const ATOM_OK: &str = "ok";

/// Atom tagging a failure tuple
pub const ATOM_ERROR: &str = "error";

/// A host-level value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Interned symbol (`ok`, `'H5T_NATIVE_INT'`)
    Atom(String),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(OrderedFloat<f64>),
    /// String / binary
    Str(String),
    /// Fixed-size tuple
    Tuple(Vec<Term>),
    /// Proper list
    List(Vec<Term>),
}

impl Term {
    /// Create an atom term
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    /// Create a string term
    pub fn string(s: impl Into<String>) -> Self {
        Term::Str(s.into())
    }

    /// The bare `ok` atom
    pub fn ok() -> Self {
        Term::atom(ATOM_OK)
    }

    /// `{ok, value}`
    pub fn ok_tuple(value: Term) -> Self {
        Term::Tuple(vec![Term::ok(), value])
    }

    /// `{error, "message"}`
    pub fn error_tuple(message: impl Into<String>) -> Self {
        Term::Tuple(vec![Term::atom(ATOM_ERROR), Term::string(message)])
    }

    /// Get the type name of this term (for diagnostics)
    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Atom(_) => "atom",
            Term::Int(_) => "integer",
            Term::Float(_) => "float",
            Term::Str(_) => "string",
            Term::Tuple(_) => "tuple",
            Term::List(_) => "list",
        }
    }

    /// True for `ok` and `{ok, _}`
    pub fn is_ok(&self) -> bool {
        match self {
            Term::Atom(a) => a == ATOM_OK,
            Term::Tuple(items) => {
                items.len() == 2 && matches!(&items[0], Term::Atom(a) if a == ATOM_OK)
            }
            _ => false,
        }
    }

    /// Payload of an `{ok, Value}` tuple
    pub fn ok_value(&self) -> Option<&Term> {
        match self {
            Term::Tuple(items) if items.len() == 2 => match &items[0] {
                Term::Atom(a) if a == ATOM_OK => Some(&items[1]),
                _ => None,
            },
            _ => None,
        }
    }

    /// Message of an `{error, "message"}` tuple
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Term::Tuple(items) if items.len() == 2 => match (&items[0], &items[1]) {
                (Term::Atom(a), Term::Str(msg)) if a == ATOM_ERROR => Some(msg),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parse a single command-line style literal
    ///
    /// Integers and floats are recognised first, double-quoted text becomes a
    /// string, anything else is an atom (single quotes are stripped). Quoted
    /// text is unescaped, so `Display` output parses back to the same term.
    pub fn parse_literal(text: &str) -> Self {
        if let Ok(i) = text.parse::<i64>() {
            return Term::Int(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            if f.is_finite() {
                return Term::Float(OrderedFloat(f));
            }
        }
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return Term::string(unescape(&text[1..text.len() - 1]));
        }
        if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
            return Term::atom(unescape(&text[1..text.len() - 1]));
        }
        Term::atom(text)
    }

    /// JSON rendering for tooling output
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{json, Value as Json};
        match self {
            Term::Atom(a) => json!({ "atom": a }),
            Term::Int(i) => json!(i),
            Term::Float(f) => json!(f.into_inner()),
            Term::Str(s) => json!(s),
            Term::Tuple(items) => json!({ "tuple": items.iter().map(Term::to_json).collect::<Vec<_>>() }),
            Term::List(items) => Json::Array(items.iter().map(Term::to_json).collect()),
        }
    }
}

fn atom_needs_quotes(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return true,
    }
    !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str, quote: char) -> fmt::Result {
    write!(f, "{}", quote)?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

/// Inverse of `write_quoted` for the text between the quotes
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(a) if atom_needs_quotes(a) => write_quoted(f, a, '\''),
            Term::Atom(a) => write!(f, "{}", a),
            Term::Int(i) => write!(f, "{}", i),
            Term::Float(x) => write!(f, "{:?}", x.into_inner()),
            Term::Str(s) => write_quoted(f, s, '"'),
            Term::Tuple(items) => {
                write!(f, "{{")?;
                write_seq(f, items)?;
                write!(f, "}}")
            }
            Term::List(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_shapes() {
        assert!(Term::ok().is_ok());
        assert!(Term::ok_tuple(Term::Int(5)).is_ok());
        assert_eq!(Term::ok_tuple(Term::Int(5)).ok_value(), Some(&Term::Int(5)));

        let err = Term::error_tuple("Can not get size");
        assert!(!err.is_ok());
        assert_eq!(err.error_message(), Some("Can not get size"));
        assert_eq!(err.ok_value(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Term::ok().to_string(), "ok");
        assert_eq!(Term::atom("H5T_NATIVE_INT").to_string(), "'H5T_NATIVE_INT'");
        assert_eq!(Term::ok_tuple(Term::Int(4)).to_string(), "{ok, 4}");
        assert_eq!(
            Term::error_tuple("Unknown type x").to_string(),
            "{error, \"Unknown type x\"}"
        );
        assert_eq!(
            Term::List(vec![Term::Int(1), Term::Float(OrderedFloat(2.5))]).to_string(),
            "[1, 2.5]"
        );
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(Term::parse_literal("42"), Term::Int(42));
        assert_eq!(Term::parse_literal("-7"), Term::Int(-7));
        assert_eq!(Term::parse_literal("1.5"), Term::Float(OrderedFloat(1.5)));
        assert_eq!(Term::parse_literal("\"abc\""), Term::string("abc"));
        assert_eq!(Term::parse_literal("'H5T_NATIVE_INT'"), Term::atom("H5T_NATIVE_INT"));
        assert_eq!(Term::parse_literal("H5T_NATIVE_INT"), Term::atom("H5T_NATIVE_INT"));
        assert_eq!(Term::parse_literal("inf"), Term::atom("inf"));
    }

    #[test]
    fn test_display_parses_back() {
        let terms = [
            Term::string("say \"hi\""),
            Term::string("C:\\hdf5\\lib"),
            Term::string("two\nlines\tand tab"),
            Term::string("ünïcode"),
            Term::atom("it's"),
            Term::atom("H5T_NATIVE_INT"),
        ];
        for term in terms {
            assert_eq!(Term::parse_literal(&term.to_string()), term, "{}", term);
        }
        assert_eq!(Term::string("a\"b").to_string(), "\"a\\\"b\"");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Term::Int(1).type_name(), "integer");
        assert_eq!(Term::atom("a").type_name(), "atom");
        assert_eq!(Term::string("a").type_name(), "string");
        assert_eq!(Term::Tuple(vec![]).type_name(), "tuple");
    }

    #[test]
    fn test_to_json() {
        let json = Term::ok_tuple(Term::Int(3)).to_json();
        assert_eq!(json, serde_json::json!({ "tuple": [{ "atom": "ok" }, 3] }));
    }
}
