//! The default RDF term type.
//!
//! A [`Node`] is an IRI, a blank node, or a literal. Literals carry a lexical
//! form, an optional language tag, and a datatype; numeric, boolean, and JSON
//! literals compare by value in addition to syntax, which is where the
//! store's value-equivalence machinery earns its keep.

use crate::term::{stable_hash, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Datatype of plain string literals.
pub const XSD_STRING: &str = "xsd:string";
/// Datatype of integer literals.
pub const XSD_INTEGER: &str = "xsd:integer";
/// Datatype of double-precision literals.
pub const XSD_DOUBLE: &str = "xsd:double";
/// Datatype of boolean literals.
pub const XSD_BOOLEAN: &str = "xsd:boolean";
/// Datatype of language-tagged strings.
pub const RDF_LANG_STRING: &str = "rdf:langString";
/// Datatype of JSON literals.
pub const RDF_JSON: &str = "rdf:JSON";

/// Datatypes whose literals compare by numeric value.
const NUMERIC_DATATYPES: &[&str] = &[
    XSD_INTEGER,
    XSD_DOUBLE,
    "xsd:decimal",
    "xsd:float",
    "xsd:long",
    "xsd:int",
    "xsd:short",
    "xsd:byte",
    "xsd:nonNegativeInteger",
    "xsd:positiveInteger",
    "xsd:unsignedLong",
    "xsd:unsignedInt",
];

/// An RDF term: an IRI, a blank node, or a literal.
///
/// # Examples
///
/// ```
/// use triplemem::Node;
///
/// let iri = Node::iri("ex:alice");
/// assert!(iri.is_iri());
///
/// let name = Node::literal("Alice");
/// assert!(name.is_literal());
///
/// let blank = Node::blank();
/// assert!(blank.is_blank());
/// ```
///
/// Typed literals with the same value but different syntax are
/// value-equivalent:
///
/// ```
/// use triplemem::{Node, Term};
///
/// let a = Node::typed("1", "xsd:integer");
/// let b = Node::typed("01", "xsd:integer");
/// assert_ne!(a, b);
/// assert!(a.value_eq(&b));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// A named term, identified by an IRI or CURIE-style string.
    ///
    /// Examples: `"ex:alice"`, `"http://example.org/alice"`
    Iri(String),

    /// A blank (anonymous) node with a unique, auto-generated ID.
    Blank(u64),

    /// A literal value.
    Literal(Literal),
}

/// A literal term: a lexical form plus an optional language tag and a
/// datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    lexical: String,
    lang: Option<String>,
    datatype: String,
}

/// Parsed value of a literal, for datatypes where value equality is coarser
/// than syntax.
#[derive(Debug, PartialEq)]
enum LiteralValue {
    Number(f64),
    Boolean(bool),
    Json(serde_json::Value),
}

impl Node {
    /// Creates a named term from an IRI or CURIE-style string.
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::Node;
    ///
    /// let node = Node::iri("user:alice");
    /// assert_eq!(node.as_iri(), Some("user:alice"));
    /// ```
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// Creates a new, unique blank node.
    ///
    /// Each call returns a distinct node.
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::Node;
    ///
    /// let a = Node::blank();
    /// let b = Node::blank();
    /// assert_ne!(a, b);
    /// ```
    pub fn blank() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self::Blank(COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Creates a blank node with a specific ID.
    pub fn blank_with_id(id: u64) -> Self {
        Self::Blank(id)
    }

    /// Creates a plain string literal (`xsd:string`).
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::Node;
    ///
    /// let val = Node::literal("Hello");
    /// assert_eq!(val.as_literal().unwrap().lexical(), "Hello");
    /// ```
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(Literal {
            lexical: s.into(),
            lang: None,
            datatype: XSD_STRING.to_string(),
        })
    }

    /// Creates a literal with an explicit datatype.
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::Node;
    ///
    /// let date = Node::typed("2024-01-01", "xsd:date");
    /// let num = Node::typed("42", "xsd:integer");
    /// ```
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal(Literal {
            lexical: lexical.into(),
            lang: None,
            datatype: datatype.into(),
        })
    }

    /// Creates a language-tagged string literal.
    pub fn lang_string(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal(Literal {
            lexical: lexical.into(),
            lang: Some(lang.into()),
            datatype: RDF_LANG_STRING.to_string(),
        })
    }

    /// Creates an integer literal (`xsd:integer`).
    pub fn integer(n: i64) -> Self {
        Self::typed(n.to_string(), XSD_INTEGER)
    }

    /// Creates a double literal (`xsd:double`).
    pub fn double(f: f64) -> Self {
        Self::typed(f.to_string(), XSD_DOUBLE)
    }

    /// Creates a boolean literal (`xsd:boolean`).
    pub fn boolean(b: bool) -> Self {
        Self::typed(b.to_string(), XSD_BOOLEAN)
    }

    /// Creates a JSON literal (`rdf:JSON`).
    ///
    /// JSON literals compare by parsed value, so two serializations of the
    /// same object are value-equivalent.
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::{Node, Term};
    /// use serde_json::json;
    ///
    /// let a = Node::json(json!({"x": 1, "y": 2}));
    /// let b = Node::typed("{\"y\":2,\"x\":1}", "rdf:JSON");
    /// assert!(a.value_eq(&b));
    /// ```
    pub fn json(value: serde_json::Value) -> Self {
        Self::typed(value.to_string(), RDF_JSON)
    }

    /// Returns `true` if this is a named (IRI) term.
    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    /// Returns `true` if this is a blank node.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    /// Returns `true` if this is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns the IRI string if this is a named term.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// For named terms, returns the namespace prefix (the part before the
    /// first colon).
    ///
    /// # Examples
    ///
    /// ```
    /// use triplemem::Node;
    ///
    /// let node = Node::iri("user:alice");
    /// assert_eq!(node.namespace(), Some("user"));
    /// ```
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => iri.split(':').next(),
            _ => None,
        }
    }

    /// For named terms, returns the local name (the part after the last
    /// colon).
    pub fn local_name(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => iri.rsplit(':').next(),
            _ => None,
        }
    }

    // ========== Well-known RDF vocabulary ==========

    /// `rdf:type` - indicates that a subject is an instance of a class.
    pub fn rdf_type() -> Self {
        Self::iri("rdf:type")
    }

    /// `rdfs:label` - a human-readable name for a resource.
    pub fn rdfs_label() -> Self {
        Self::iri("rdfs:label")
    }

    /// `rdfs:comment` - a human-readable description of a resource.
    pub fn rdfs_comment() -> Self {
        Self::iri("rdfs:comment")
    }

    /// `owl:sameAs` - indicates two names refer to the same thing.
    pub fn owl_same_as() -> Self {
        Self::iri("owl:sameAs")
    }
}

impl Literal {
    /// The lexical form.
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The language tag, for language-tagged strings.
    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// The datatype.
    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    fn is_numeric(&self) -> bool {
        NUMERIC_DATATYPES.contains(&self.datatype.as_str())
    }

    /// Whether this literal's datatype compares by value rather than syntax.
    pub fn value_comparable(&self) -> bool {
        self.is_numeric() || self.datatype == XSD_BOOLEAN || self.datatype == RDF_JSON
    }

    /// Parses the lexical form according to the datatype.
    ///
    /// Returns `None` for datatypes compared structurally, or when the
    /// lexical form does not parse (such a literal falls back to structural
    /// comparison).
    fn parsed(&self) -> Option<LiteralValue> {
        if self.is_numeric() {
            self.lexical.trim().parse::<f64>().ok().map(LiteralValue::Number)
        } else if self.datatype == XSD_BOOLEAN {
            match self.lexical.trim() {
                "true" | "1" => Some(LiteralValue::Boolean(true)),
                "false" | "0" => Some(LiteralValue::Boolean(false)),
                _ => None,
            }
        } else if self.datatype == RDF_JSON {
            serde_json::from_str(&self.lexical).ok().map(LiteralValue::Json)
        } else {
            None
        }
    }
}

impl Term for Node {
    fn indexing_hash(&self) -> u64 {
        // Value-comparable literals hash their parsed value so that
        // value-equivalent forms land in the same bunch. Tag bytes keep the
        // collapsed domains separate from structural hashes.
        if let Self::Literal(lit) = self {
            match lit.parsed() {
                Some(LiteralValue::Number(n)) => {
                    let n = if n == 0.0 { 0.0 } else { n };
                    return stable_hash(&(1u8, n.to_bits()));
                }
                Some(LiteralValue::Boolean(b)) => return stable_hash(&(2u8, b)),
                Some(LiteralValue::Json(v)) => return stable_hash(&(3u8, v.to_string())),
                None => {}
            }
        }
        self.term_hash()
    }

    fn value_eq(&self, other: &Self) -> bool {
        if let (Self::Literal(a), Self::Literal(b)) = (self, other) {
            if let (Some(va), Some(vb)) = (a.parsed(), b.parsed()) {
                return va == vb;
            }
        }
        self == other
    }

    fn value_eq_matters(&self) -> bool {
        matches!(self, Self::Literal(lit) if lit.value_comparable())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(id) => write!(f, "_:b{}", id),
            Self::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lang, self.datatype.as_str()) {
            (Some(lang), _) => write!(f, "\"{}\"@{}", self.lexical, lang),
            (None, XSD_STRING) => write!(f, "\"{}\"", self.lexical),
            (None, dt) => write!(f, "\"{}\"^^<{}>", self.lexical, dt),
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Iri(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Iri(s)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_iri_node() {
        let node = Node::iri("user:alice");
        assert!(node.is_iri());
        assert_eq!(node.as_iri(), Some("user:alice"));
        assert_eq!(node.namespace(), Some("user"));
        assert_eq!(node.local_name(), Some("alice"));
    }

    #[test]
    fn test_blank_nodes_are_unique() {
        let a = Node::blank();
        let b = Node::blank();
        assert!(a.is_blank());
        assert_ne!(a, b);
    }

    #[test]
    fn test_plain_literal() {
        let val = Node::literal("Alice");
        let lit = val.as_literal().unwrap();
        assert_eq!(lit.lexical(), "Alice");
        assert_eq!(lit.datatype(), XSD_STRING);
        assert!(!val.value_eq_matters());
    }

    #[test]
    fn test_numeric_value_equivalence() {
        let a = Node::typed("1", XSD_INTEGER);
        let b = Node::typed("01", XSD_INTEGER);
        let c = Node::typed("1.0", XSD_DOUBLE);
        let d = Node::typed("2", XSD_INTEGER);

        assert_ne!(a, b);
        assert!(a.value_eq(&b));
        assert!(a.value_eq(&c));
        assert!(!a.value_eq(&d));
        assert!(a.value_eq_matters());

        assert_eq!(a.indexing_hash(), b.indexing_hash());
        assert_eq!(a.indexing_hash(), c.indexing_hash());
        assert_ne!(a.indexing_hash(), a.term_hash());
    }

    #[test]
    fn test_negative_zero_collapses() {
        let a = Node::typed("0", XSD_INTEGER);
        let b = Node::typed("-0.0", XSD_DOUBLE);
        assert!(a.value_eq(&b));
        assert_eq!(a.indexing_hash(), b.indexing_hash());
    }

    #[test]
    fn test_boolean_value_equivalence() {
        let a = Node::boolean(true);
        let b = Node::typed("1", XSD_BOOLEAN);
        assert!(a.value_eq(&b));
        assert_eq!(a.indexing_hash(), b.indexing_hash());
    }

    #[test]
    fn test_json_value_equivalence() {
        let a = Node::json(json!({"x": 1, "y": [2, 3]}));
        let b = Node::typed("{\"y\":[2,3],\"x\":1}", RDF_JSON);
        assert_ne!(a, b);
        assert!(a.value_eq(&b));
        assert_eq!(a.indexing_hash(), b.indexing_hash());
    }

    #[test]
    fn test_unparseable_typed_literal_falls_back_to_structural() {
        let a = Node::typed("not-a-number", XSD_INTEGER);
        let b = Node::typed("not-a-number", XSD_INTEGER);
        let c = Node::typed("also-not", XSD_INTEGER);
        assert!(a.value_eq(&b));
        assert!(!a.value_eq(&c));
    }

    #[test]
    fn test_lang_string() {
        let en = Node::lang_string("Hello", "en");
        let es = Node::lang_string("Hola", "es");
        assert_ne!(en, es);
        assert_eq!(en.as_literal().unwrap().lang(), Some("en"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Node::iri("ex:alice")), "<ex:alice>");
        assert_eq!(format!("{}", Node::blank_with_id(7)), "_:b7");
        assert_eq!(format!("{}", Node::literal("hi")), "\"hi\"");
        assert_eq!(
            format!("{}", Node::integer(5)),
            "\"5\"^^<xsd:integer>"
        );
        assert_eq!(
            format!("{}", Node::lang_string("hi", "en")),
            "\"hi\"@en"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let node = Node::typed("42", XSD_INTEGER);
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
