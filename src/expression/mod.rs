//! Logical class expressions of generated phenotype classes
//!
//! A [`ClassExpression`] is an immutable tree that is built bottom-up from
//! atomic classes, intersections and existential restrictions. The children
//! of an intersection form a set: two intersections that only differ in the
//! order of their children describe the same class. [`Fingerprint`] provides
//! the canonical form that is used to detect such equivalent expressions.

use std::fmt::Display;

use crate::TermId;

mod fingerprint;
pub use fingerprint::Fingerprint;

/// A node of a logical class expression
///
/// # Examples
///
/// ```
/// use zpgen::{ClassExpression, TermId};
///
/// let fin = TermId::try_from("ZFA:0000108").unwrap();
/// let part_of = TermId::try_from("BFO:0000050").unwrap();
/// let ray = TermId::try_from("ZFA:0000109").unwrap();
///
/// // fin ray and (part of some fin)
/// let expr = ClassExpression::intersection_of([
///     ClassExpression::class(ray),
///     ClassExpression::some(part_of, ClassExpression::class(fin)),
/// ]);
/// assert_eq!(expr.fingerprint().as_str(), "[BFO:0000050(ZFA:0000108),ZFA:0000109]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassExpression {
    /// A named class, e.g. `ZFA:0000108`
    Class(TermId),
    /// The intersection of all child expressions
    IntersectionOf(Vec<ClassExpression>),
    /// An existential restriction: `property some filler`
    SomeValuesFrom {
        /// The object property of the restriction
        property: TermId,
        /// The class expression the property points to
        filler: Box<ClassExpression>,
    },
}

impl ClassExpression {
    /// A named class
    pub fn class(id: TermId) -> Self {
        ClassExpression::Class(id)
    }

    /// The intersection of all `operands`
    pub fn intersection_of<I: IntoIterator<Item = ClassExpression>>(operands: I) -> Self {
        ClassExpression::IntersectionOf(operands.into_iter().collect())
    }

    /// The existential restriction `property some filler`
    pub fn some(property: TermId, filler: ClassExpression) -> Self {
        ClassExpression::SomeValuesFrom {
            property,
            filler: Box::new(filler),
        }
    }

    /// The canonical, order independent fingerprint of the expression
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }

    /// Returns `true` if both expressions are identical up to the order
    /// of intersection operands
    pub fn is_equivalent(&self, other: &ClassExpression) -> bool {
        self.fingerprint() == other.fingerprint()
    }

    /// Returns the total number of nodes of the expression tree
    pub fn len(&self) -> usize {
        match self {
            ClassExpression::Class(_) => 1,
            ClassExpression::IntersectionOf(operands) => {
                1 + operands.iter().map(ClassExpression::len).sum::<usize>()
            }
            ClassExpression::SomeValuesFrom { filler, .. } => 1 + filler.len(),
        }
    }

    /// Always `false`, an expression has at least one node
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Writes the expression in OWL Functional Syntax, using the `obo:` prefix
impl Display for ClassExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassExpression::Class(id) => write!(f, "obo:{}", id.iri_fragment()),
            ClassExpression::IntersectionOf(operands) => {
                write!(f, "ObjectIntersectionOf(")?;
                for (idx, operand) in operands.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{operand}")?;
                }
                write!(f, ")")
            }
            ClassExpression::SomeValuesFrom { property, filler } => {
                write!(
                    f,
                    "ObjectSomeValuesFrom(obo:{} {filler})",
                    property.iri_fragment()
                )
            }
        }
    }
}
