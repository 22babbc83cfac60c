//! Reads the phenotype classes of a previously generated ontology
//!
//! Only the subset of the OWL Functional Syntax that [`crate::writer::OntologyWriter`]
//! produces is understood:
//!
//! ```text
//! Prefix(obo:=<http://purl.obolibrary.org/obo/>)
//! Prefix(rdfs:=<http://www.w3.org/2000/01/rdf-schema#>)
//! Ontology(<http://purl.obolibrary.org/obo/zp.owl>
//! EquivalentClasses(obo:ZP_0000001 ObjectSomeValuesFrom(obo:BFO_0000051 ObjectIntersectionOf(...)))
//! AnnotationAssertion(rdfs:label obo:ZP_0000001 "abnormal(ly) shape fin")
//! AnnotationAssertion(owl:deprecated obo:ZP_0000002 "true"^^xsd:boolean)
//! AnnotationAssertion(obo:IAO_0100001 obo:ZP_0000002 obo:ZP_0000001)
//! )
//! ```
//!
//! IRIs can be written as prefixed names or in full (`<...>`). The document
//! must consist of `Prefix` declarations and exactly one `Ontology`, anything
//! else (e.g. RDF/XML) is rejected. Inside the ontology, all axioms other than
//! `EquivalentClasses` of `ZP` classes, `ZP` class declarations and the
//! annotations shown above are ignored.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use tracing::{debug, trace};

use crate::expression::ClassExpression;
use crate::term::{TermId, ZpId};
use crate::{ZpError, ZpResult, OBO_IRI};

const RDFS_IRI: &str = "http://www.w3.org/2000/01/rdf-schema#";
const OWL_IRI: &str = "http://www.w3.org/2002/07/owl#";
const XSD_IRI: &str = "http://www.w3.org/2001/XMLSchema#";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const OWL_DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";
/// `term replaced by`
const IAO_REPLACED_BY: &str = "http://purl.obolibrary.org/obo/IAO_0100001";

/// A phenotype class of a previously generated ontology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwlClass {
    /// The published identifier
    pub id: ZpId,
    /// The logical definition of the class
    pub expression: ClassExpression,
    /// The label of the class, if present
    pub label: Option<String>,
}

/// A published identifier without a logical definition
///
/// Obsolete classes are written as deprecated stubs. Their identifiers are
/// never assigned again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObsoleteClass {
    /// The published identifier
    pub id: ZpId,
    /// The class that replaces this one
    pub replaced_by: Option<ZpId>,
    /// The last label of the class
    pub label: Option<String>,
}

/// All `ZP` identifiers of a previously generated ontology
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwlDocument {
    /// Classes with a logical definition, in document order
    pub classes: Vec<OwlClass>,
    /// Declared or deprecated classes without a definition, ordered by identifier
    pub obsolete: Vec<ObsoleteClass>,
}

impl OwlDocument {
    /// The number of identifiers in the document
    pub fn len(&self) -> usize {
        self.classes.len() + self.obsolete.len()
    }

    /// Returns `true` if the document does not contain any `ZP` identifier
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.obsolete.is_empty()
    }
}

/// Reads all phenotype classes from an ontology file
///
/// # Errors
///
/// - [`ZpError::CannotOpenFile`] if the file can't be opened
/// - [`ZpError::InvalidOntology`] if the file is not valid
pub fn read_ontology_file<P: AsRef<Path>>(path: P) -> ZpResult<OwlDocument> {
    let content = super::read_to_string(path)?;
    parse_ontology(&content)
}

/// Parses all phenotype classes of an ontology document
///
/// # Errors
///
/// [`ZpError::InvalidOntology`] if the document is malformed, is not an
/// OWL Functional Syntax document or a phenotype class uses an unsupported
/// class expression
pub fn parse_ontology(content: &str) -> ZpResult<OwlDocument> {
    let tokens = tokenize(content)?;
    let nodes = Nodes::new(&tokens).parse_all()?;

    let mut prefixes: HashMap<String, String> = HashMap::new();
    prefixes.insert("obo:".to_string(), OBO_IRI.to_string());
    prefixes.insert("rdfs:".to_string(), RDFS_IRI.to_string());
    prefixes.insert("owl:".to_string(), OWL_IRI.to_string());
    prefixes.insert("xsd:".to_string(), XSD_IRI.to_string());

    let mut axioms: Option<&[Node]> = None;
    for node in &nodes {
        match node {
            Node::List(name, args) if name == "Prefix" => {
                let (Some(Node::Name(prefix)), Some(Node::Iri(iri))) = (args.first(), args.get(1))
                else {
                    return Err(invalid("malformed Prefix declaration"));
                };
                let prefix = prefix.trim_end_matches('=');
                prefixes.insert(prefix.to_string(), iri.to_string());
            }
            Node::List(name, args) if name == "Ontology" => {
                if axioms.is_some() {
                    return Err(invalid("more than one Ontology"));
                }
                axioms = Some(args.as_slice());
            }
            _ => {
                return Err(ZpError::InvalidOntology(format!(
                    "expected Prefix(...) or Ontology(...), found {}",
                    node.describe()
                )))
            }
        }
    }
    let Some(axioms) = axioms else {
        return Err(invalid("no Ontology(...) found"));
    };

    let resolver = Resolver { prefixes };
    let mut classes: Vec<(ZpId, ClassExpression)> = Vec::new();
    let mut labels: HashMap<ZpId, String> = HashMap::new();
    let mut declared: BTreeSet<ZpId> = BTreeSet::new();
    let mut replaced_by: HashMap<ZpId, ZpId> = HashMap::new();

    for axiom in axioms {
        let Node::List(name, args) = axiom else {
            continue;
        };
        let args = without_axiom_annotations(args);
        match name.as_str() {
            "EquivalentClasses" => {
                if let Some(class) = resolver.equivalent_class(args)? {
                    classes.push(class);
                }
            }
            "Declaration" => {
                if let Some(id) = resolver.declared_class(args)? {
                    declared.insert(id);
                }
            }
            "AnnotationAssertion" => match resolver.annotation(args)? {
                Some(Annotation::Label(id, label)) => {
                    labels.entry(id).or_insert(label);
                }
                Some(Annotation::Deprecated(id)) => {
                    declared.insert(id);
                }
                Some(Annotation::ReplacedBy(id, replacement)) => {
                    declared.insert(id);
                    replaced_by.insert(id, replacement);
                }
                None => {}
            },
            _ => trace!("Ignoring {} axiom", name),
        }
    }

    let defined: HashSet<ZpId> = classes.iter().map(|(id, _)| *id).collect();
    let obsolete: Vec<ObsoleteClass> = declared
        .into_iter()
        .filter(|id| !defined.contains(id))
        .map(|id| ObsoleteClass {
            id,
            replaced_by: replaced_by.get(&id).copied(),
            label: labels.get(&id).cloned(),
        })
        .collect();

    debug!(
        "Found {} phenotype classes and {} obsolete classes",
        classes.len(),
        obsolete.len()
    );
    Ok(OwlDocument {
        classes: classes
            .into_iter()
            .map(|(id, expression)| OwlClass {
                id,
                label: labels.remove(&id),
                expression,
            })
            .collect(),
        obsolete,
    })
}

fn invalid(msg: &str) -> ZpError {
    ZpError::InvalidOntology(msg.to_string())
}

fn without_axiom_annotations(args: &[Node]) -> &[Node] {
    let n = args
        .iter()
        .take_while(|arg| matches!(arg, Node::List(name, _) if name == "Annotation"))
        .count();
    &args[n..]
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    /// Keywords and prefixed names
    Name(&'a str),
    /// Content of `<...>`
    Iri(&'a str),
    Literal(String),
}

fn tokenize(content: &str) -> ZpResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let bytes = content.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'(' => {
                tokens.push(Token::Open);
                idx += 1;
            }
            b')' => {
                tokens.push(Token::Close);
                idx += 1;
            }
            b'#' => {
                // comment until the end of the line
                while idx < bytes.len() && bytes[idx] != b'\n' {
                    idx += 1;
                }
            }
            b'<' => {
                let Some(len) = content[idx + 1..].find('>') else {
                    return Err(invalid("unterminated IRI"));
                };
                tokens.push(Token::Iri(&content[idx + 1..idx + 1 + len]));
                idx += len + 2;
            }
            b'"' => {
                let (literal, len) = read_literal(&content[idx + 1..])?;
                tokens.push(Token::Literal(literal));
                idx += len + 1;
                idx = skip_literal_suffix(content, idx);
            }
            b if b.is_ascii_whitespace() => idx += 1,
            _ => {
                let start = idx;
                while idx < bytes.len()
                    && !bytes[idx].is_ascii_whitespace()
                    && !matches!(bytes[idx], b'(' | b')' | b'<' | b'"')
                {
                    idx += 1;
                }
                tokens.push(Token::Name(&content[start..idx]));
            }
        }
    }
    Ok(tokens)
}

/// Reads a quoted literal, starting after the opening quote
///
/// Returns the unescaped literal and the number of consumed bytes,
/// including the closing quote.
fn read_literal(s: &str) -> ZpResult<(String, usize)> {
    let mut literal = String::new();
    let mut chars = s.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((literal, idx + 1)),
            '\\' => match chars.next() {
                Some((_, escaped)) => literal.push(escaped),
                None => break,
            },
            c => literal.push(c),
        }
    }
    Err(invalid("unterminated literal"))
}

/// Skips a datatype (`^^xsd:string`) or language tag (`@en`) of a literal
fn skip_literal_suffix(content: &str, mut idx: usize) -> usize {
    let bytes = content.as_bytes();
    let skip_word = |mut idx: usize| {
        while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() && bytes[idx] != b')' {
            idx += 1;
        }
        idx
    };
    if content[idx..].starts_with("^^<") {
        if let Some(len) = content[idx..].find('>') {
            idx += len + 1;
        }
    } else if content[idx..].starts_with("^^") || content[idx..].starts_with('@') {
        idx = skip_word(idx);
    }
    idx
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Name(String),
    Iri(String),
    Literal(String),
    List(String, Vec<Node>),
}

impl Node {
    /// Short description for error messages
    fn describe(&self) -> String {
        match self {
            Node::Name(name) => name.clone(),
            Node::Iri(iri) => format!("<{iri}>"),
            Node::Literal(_) => "a literal".to_string(),
            Node::List(name, _) => format!("{name}(...)"),
        }
    }
}

enum Annotation {
    Label(ZpId, String),
    Deprecated(ZpId),
    ReplacedBy(ZpId, ZpId),
}

struct Nodes<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
}

impl<'a> Nodes<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_all(&mut self) -> ZpResult<Vec<Node>> {
        let mut nodes = Vec::new();
        while self.pos < self.tokens.len() {
            nodes.push(self.parse_node()?);
        }
        Ok(nodes)
    }

    fn parse_node(&mut self) -> ZpResult<Node> {
        let tokens = self.tokens;
        let token = tokens
            .get(self.pos)
            .ok_or_else(|| invalid("unexpected end of document"))?;
        self.pos += 1;
        match token {
            Token::Name(name) => {
                if tokens.get(self.pos) == Some(&Token::Open) {
                    self.pos += 1;
                    let mut args = Vec::new();
                    loop {
                        match tokens.get(self.pos) {
                            Some(Token::Close) => {
                                self.pos += 1;
                                break;
                            }
                            Some(_) => args.push(self.parse_node()?),
                            None => {
                                return Err(ZpError::InvalidOntology(format!(
                                    "unclosed {name}("
                                )))
                            }
                        }
                    }
                    Ok(Node::List(name.to_string(), args))
                } else {
                    Ok(Node::Name(name.to_string()))
                }
            }
            Token::Iri(iri) => Ok(Node::Iri(iri.to_string())),
            Token::Literal(literal) => Ok(Node::Literal(literal.clone())),
            Token::Open => Err(invalid("unexpected (")),
            Token::Close => Err(invalid("unexpected )")),
        }
    }
}

struct Resolver {
    prefixes: HashMap<String, String>,
}

impl Resolver {
    /// Expands a prefixed name or IRI into the full IRI
    fn iri(&self, node: &Node) -> ZpResult<String> {
        match node {
            Node::Iri(iri) => Ok(iri.clone()),
            Node::Name(name) => {
                let Some(sep) = name.find(':') else {
                    return Err(ZpError::InvalidOntology(format!("{name} is not an IRI")));
                };
                let (prefix, local) = name.split_at(sep + 1);
                match self.prefixes.get(prefix) {
                    Some(base) => Ok(format!("{base}{local}")),
                    None => Err(ZpError::InvalidOntology(format!("unknown prefix {prefix}"))),
                }
            }
            _ => Err(ZpError::InvalidOntology(format!("{node:?} is not an IRI"))),
        }
    }

    /// The last segment of an OBO IRI, e.g. `ZFA_0000108`
    fn obo_fragment(&self, node: &Node) -> ZpResult<Option<String>> {
        let iri = self.iri(node)?;
        Ok(iri.strip_prefix(OBO_IRI).map(str::to_string))
    }

    fn zp_id(&self, node: &Node) -> ZpResult<Option<ZpId>> {
        if matches!(node, Node::List(..) | Node::Literal(_)) {
            return Ok(None);
        }
        match self.obo_fragment(node)? {
            Some(fragment) if ZpId::is_zp(&fragment) => Ok(Some(ZpId::from_iri_fragment(&fragment)?)),
            _ => Ok(None),
        }
    }

    fn term_id(&self, node: &Node) -> ZpResult<TermId> {
        match self.obo_fragment(node)? {
            Some(fragment) => TermId::from_iri_fragment(&fragment),
            None => Err(ZpError::InvalidOntology(format!(
                "{} is not an OBO term",
                self.iri(node)?
            ))),
        }
    }

    fn expression(&self, node: &Node) -> ZpResult<ClassExpression> {
        match node {
            Node::Name(_) | Node::Iri(_) => Ok(ClassExpression::class(self.term_id(node)?)),
            Node::List(name, args) if name == "ObjectIntersectionOf" => {
                if args.is_empty() {
                    return Err(invalid("empty ObjectIntersectionOf"));
                }
                let operands = args
                    .iter()
                    .map(|arg| self.expression(arg))
                    .collect::<ZpResult<Vec<ClassExpression>>>()?;
                Ok(ClassExpression::intersection_of(operands))
            }
            Node::List(name, args) if name == "ObjectSomeValuesFrom" => {
                let [property, filler] = args.as_slice() else {
                    return Err(invalid("ObjectSomeValuesFrom requires two arguments"));
                };
                Ok(ClassExpression::some(
                    self.term_id(property)?,
                    self.expression(filler)?,
                ))
            }
            Node::List(name, _) => Err(ZpError::InvalidOntology(format!(
                "unsupported class expression {name}"
            ))),
            Node::Literal(literal) => Err(ZpError::InvalidOntology(format!(
                "literal \"{literal}\" is not a class expression"
            ))),
        }
    }

    /// `EquivalentClasses(obo:ZP_nnnnnnn <expression>)` in any operand order
    fn equivalent_class(&self, args: &[Node]) -> ZpResult<Option<(ZpId, ClassExpression)>> {
        let [a, b] = args else {
            trace!("Ignoring EquivalentClasses with {} operands", args.len());
            return Ok(None);
        };
        let (id, definition) = match (self.zp_id(a)?, self.zp_id(b)?) {
            (Some(id), None) => (id, b),
            (None, Some(id)) => (id, a),
            _ => return Ok(None),
        };
        Ok(Some((id, self.expression(definition)?)))
    }

    /// `Declaration(Class(obo:ZP_nnnnnnn))`
    fn declared_class(&self, args: &[Node]) -> ZpResult<Option<ZpId>> {
        match args {
            [Node::List(kind, entity)] if kind == "Class" => match entity.as_slice() {
                [class] => self.zp_id(class),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    /// `rdfs:label`, `owl:deprecated` and `term replaced by` annotations of `ZP` classes
    fn annotation(&self, args: &[Node]) -> ZpResult<Option<Annotation>> {
        let [property, subject, value] = args else {
            return Ok(None);
        };
        let property = self.iri(property)?;
        if !matches!(
            property.as_str(),
            RDFS_LABEL | OWL_DEPRECATED | IAO_REPLACED_BY
        ) {
            return Ok(None);
        }
        let Some(id) = self.zp_id(subject)? else {
            return Ok(None);
        };
        let annotation = match (property.as_str(), value) {
            (RDFS_LABEL, Node::Literal(label)) => Some(Annotation::Label(id, label.clone())),
            (OWL_DEPRECATED, Node::Literal(flag)) if flag == "true" => {
                Some(Annotation::Deprecated(id))
            }
            (IAO_REPLACED_BY, _) => self
                .zp_id(value)?
                .map(|replacement| Annotation::ReplacedBy(id, replacement)),
            _ => None,
        };
        Ok(annotation)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DOCUMENT: &str = r#"Prefix(:=<http://purl.obolibrary.org/obo/zp.owl#>)
Prefix(obo:=<http://purl.obolibrary.org/obo/>)
Prefix(rdfs:=<http://www.w3.org/2000/01/rdf-schema#>)

Ontology(<http://purl.obolibrary.org/obo/zp.owl>

# Class: obo:ZP_0000001
EquivalentClasses(obo:ZP_0000001 ObjectSomeValuesFrom(obo:BFO_0000051 ObjectIntersectionOf(obo:PATO_0000052 ObjectSomeValuesFrom(obo:RO_0002180 obo:PATO_0000460) ObjectSomeValuesFrom(obo:BFO_0000052 obo:ZFA_0000001))))
AnnotationAssertion(rdfs:label obo:ZP_0000001 "abnormal(ly) shape organ")

AnnotationAssertion(rdfs:label <http://purl.obolibrary.org/obo/ZP_0000007> "abnormal(ly) \"quoted\" fin"^^xsd:string)
EquivalentClasses(ObjectSomeValuesFrom(<http://purl.obolibrary.org/obo/BFO_0000051> <http://purl.obolibrary.org/obo/ZFA_0000108>) <http://purl.obolibrary.org/obo/ZP_0000007>)
Declaration(Class(obo:ZP_0000007))
SubClassOf(obo:ZP_0000007 obo:ZP_0000001)
)
"#;

    #[test]
    fn parse_document() {
        let document = parse_ontology(DOCUMENT).unwrap();
        assert!(document.obsolete.is_empty());
        let classes = document.classes;
        assert_eq!(classes.len(), 2);

        assert_eq!(classes[0].id, "ZP:0000001");
        assert_eq!(classes[0].label.as_deref(), Some("abnormal(ly) shape organ"));
        assert_eq!(
            classes[0].expression.fingerprint().as_str(),
            "BFO:0000051([BFO:0000052(ZFA:0000001),PATO:0000052,RO:0002180(PATO:0000460)])"
        );

        assert_eq!(classes[1].id, "ZP:0000007");
        assert_eq!(classes[1].label.as_deref(), Some("abnormal(ly) \"quoted\" fin"));
        assert_eq!(
            classes[1].expression.fingerprint().as_str(),
            "BFO:0000051(ZFA:0000108)"
        );
    }

    #[test]
    fn empty_document() {
        assert!(parse_ontology("Ontology()").unwrap().is_empty());
        assert!(parse_ontology("Prefix(obo:=<http://purl.obolibrary.org/obo/>) Ontology(<http://purl.obolibrary.org/obo/zp.owl>)")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn document_without_ontology() {
        assert!(matches!(parse_ontology(""), Err(ZpError::InvalidOntology(_))));
        assert!(matches!(
            parse_ontology("Prefix(obo:=<http://purl.obolibrary.org/obo/>)"),
            Err(ZpError::InvalidOntology(_))
        ));
        assert!(parse_ontology("Ontology() Ontology()").is_err());
    }

    #[test]
    fn rdf_xml_is_rejected() {
        let doc = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:owl="http://www.w3.org/2002/07/owl#">
    <owl:Ontology rdf:about="http://purl.obolibrary.org/obo/zp.owl"/>
    <owl:Class rdf:about="http://purl.obolibrary.org/obo/ZP_0000007">
        <rdfs:label>abnormal(ly) shape fin</rdfs:label>
    </owl:Class>
</rdf:RDF>
"#;
        assert!(matches!(parse_ontology(doc), Err(ZpError::InvalidOntology(_))));
    }

    #[test]
    fn trailing_content_is_rejected() {
        let doc = "Ontology(EquivalentClasses(obo:ZP_0000003 obo:ZFA_0000001)) garbage";
        assert!(matches!(parse_ontology(doc), Err(ZpError::InvalidOntology(_))));
    }

    #[test]
    fn obsolete_classes() {
        let doc = r#"Prefix(owl:=<http://www.w3.org/2002/07/owl#>)
Ontology(<http://purl.obolibrary.org/obo/zp.owl>
EquivalentClasses(obo:ZP_0000002 obo:ZFA_0000001)
Declaration(Class(obo:ZP_0000002))
Declaration(Class(obo:ZP_0000004))
AnnotationAssertion(rdfs:label obo:ZP_0000004 "abnormal(ly) shape organ")
AnnotationAssertion(owl:deprecated obo:ZP_0000004 "true"^^xsd:boolean)
AnnotationAssertion(obo:IAO_0100001 obo:ZP_0000004 obo:ZP_0000002)
AnnotationAssertion(owl:deprecated obo:ZP_0000009 "true"^^xsd:boolean)
Declaration(Class(obo:ZP_0000003))
)"#;
        let document = parse_ontology(doc).unwrap();
        assert_eq!(document.classes.len(), 1);
        assert_eq!(document.len(), 4);

        let obsolete = &document.obsolete;
        assert_eq!(obsolete.len(), 3);
        assert_eq!(obsolete[0].id, "ZP:0000003");
        assert!(obsolete[0].replaced_by.is_none());
        assert_eq!(obsolete[1].id, "ZP:0000004");
        assert_eq!(obsolete[1].replaced_by, Some(ZpId::from(2u32)));
        assert_eq!(obsolete[1].label.as_deref(), Some("abnormal(ly) shape organ"));
        assert_eq!(obsolete[2].id, "ZP:0000009");
    }

    #[test]
    fn class_without_label() {
        let doc = "Ontology(EquivalentClasses(obo:ZP_0000003 obo:ZFA_0000001))";
        let classes = parse_ontology(doc).unwrap().classes;
        assert_eq!(classes.len(), 1);
        assert!(classes[0].label.is_none());
    }

    #[test]
    fn axiom_annotations_are_ignored() {
        let doc = r#"Ontology(EquivalentClasses(Annotation(rdfs:comment "x") obo:ZP_0000003 obo:ZFA_0000001))"#;
        let classes = parse_ontology(doc).unwrap().classes;
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].id, "ZP:0000003");
    }

    #[test]
    fn non_zp_equivalences_are_ignored() {
        let doc = "Ontology(EquivalentClasses(obo:ZFA_0000002 obo:ZFA_0000001))";
        assert!(parse_ontology(doc).unwrap().is_empty());
    }

    #[test]
    fn unsupported_expression() {
        let doc = "Ontology(EquivalentClasses(obo:ZP_0000003 ObjectUnionOf(obo:ZFA_0000001 obo:ZFA_0000002)))";
        assert!(matches!(parse_ontology(doc), Err(ZpError::InvalidOntology(_))));
    }

    #[test]
    fn unknown_prefix() {
        let doc = "Ontology(EquivalentClasses(obo:ZP_0000003 foo:ZFA_0000001))";
        assert!(parse_ontology(doc).is_err());
    }

    #[test]
    fn unbalanced_parentheses() {
        assert!(parse_ontology("Ontology(EquivalentClasses(obo:ZP_0000003 obo:ZFA_0000001)").is_err());
        assert!(parse_ontology("Ontology())").is_err());
    }

    #[test]
    fn unterminated_tokens() {
        assert!(parse_ontology("Ontology(<http://foo").is_err());
        assert!(parse_ontology("Ontology(AnnotationAssertion(rdfs:label obo:ZP_0000001 \"foo))").is_err());
    }
}
