//! Order independent identity of class expressions

use std::fmt::Display;

use smallvec::SmallVec;

use super::ClassExpression;

/// Canonical serialization of a [`ClassExpression`]
///
/// The fingerprint is built recursively:
///
/// | Node | Fingerprint |
/// | --- | --- |
/// | Class | the OBO ID, e.g. `ZFA:0000108` |
/// | Existential restriction | `<property>(<filler>)`, e.g. `BFO:0000050(ZFA:0000108)` |
/// | Intersection | `[<a>,<b>,...]` with the operand fingerprints sorted and deduplicated |
///
/// [`crate::TermId`]s cannot contain any of the delimiters `(`, `)`, `[`, `]`
/// or `,`, so the serialization can be parsed back unambiguously. Two
/// expressions have the same fingerprint if and only if they are identical
/// up to the order (and repetition) of intersection operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Calculates the fingerprint of `expression`
    pub fn of(expression: &ClassExpression) -> Self {
        let mut buf = String::with_capacity(64);
        serialize(expression, &mut buf);
        Fingerprint(buf)
    }

    /// The serialized fingerprint
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn serialize(expression: &ClassExpression, buf: &mut String) {
    match expression {
        ClassExpression::Class(id) => buf.push_str(id.as_str()),
        ClassExpression::SomeValuesFrom { property, filler } => {
            buf.push_str(property.as_str());
            buf.push('(');
            serialize(filler, buf);
            buf.push(')');
        }
        ClassExpression::IntersectionOf(operands) => {
            let mut parts: SmallVec<[String; 4]> = operands
                .iter()
                .map(|operand| {
                    let mut part = String::new();
                    serialize(operand, &mut part);
                    part
                })
                .collect();
            parts.sort_unstable();
            parts.dedup();

            buf.push('[');
            for (idx, part) in parts.iter().enumerate() {
                if idx > 0 {
                    buf.push(',');
                }
                buf.push_str(part);
            }
            buf.push(']');
        }
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TermId;

    fn class(id: &str) -> ClassExpression {
        ClassExpression::class(TermId::try_from(id).unwrap())
    }

    fn some(prop: &str, filler: ClassExpression) -> ClassExpression {
        ClassExpression::some(TermId::try_from(prop).unwrap(), filler)
    }

    /// All permutations of `items` (Heap's algorithm)
    fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
        fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }
            for i in 0..k {
                heap(k - 1, items, out);
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
            }
        }
        let mut items = items.to_vec();
        let mut out = Vec::new();
        heap(items.len(), &mut items, &mut out);
        out
    }

    #[test]
    fn atomic_class() {
        assert_eq!(Fingerprint::of(&class("ZFA:0000108")).as_str(), "ZFA:0000108");
    }

    #[test]
    fn restriction() {
        let expr = some("BFO:0000052", class("ZFA:0000108"));
        assert_eq!(expr.fingerprint().as_str(), "BFO:0000052(ZFA:0000108)");
    }

    #[test]
    fn intersection_is_sorted() {
        let expr = ClassExpression::intersection_of([class("ZFA:2"), class("PATO:1"), class("GO:3")]);
        assert_eq!(expr.fingerprint().as_str(), "[GO:3,PATO:1,ZFA:2]");
    }

    #[test]
    fn every_permutation_has_the_same_fingerprint() {
        let operands = vec![
            class("PATO:0000628"),
            some("RO:0002180", class("PATO:0000460")),
            some(
                "BFO:0000052",
                ClassExpression::intersection_of([
                    class("ZFA:0000109"),
                    some("BFO:0000050", class("ZFA:0000108")),
                ]),
            ),
            some("BFO:0000070", class("GO:0005634")),
        ];
        let expected = ClassExpression::intersection_of(operands.clone()).fingerprint();

        let all = permutations(&operands);
        assert_eq!(all.len(), 24);
        for permutation in all {
            let expr = some("BFO:0000051", ClassExpression::intersection_of(permutation));
            let outer = some(
                "BFO:0000051",
                ClassExpression::intersection_of(operands.clone()),
            );
            assert_eq!(expr.fingerprint(), outer.fingerprint());
            if let ClassExpression::SomeValuesFrom { filler, .. } = &expr {
                assert_eq!(filler.fingerprint(), expected);
            }
        }
    }

    #[test]
    fn nested_intersections_are_canonical() {
        let a = ClassExpression::intersection_of([
            class("ZFA:1"),
            some("BFO:0000050", ClassExpression::intersection_of([class("ZFA:3"), class("ZFA:2")])),
        ]);
        let b = ClassExpression::intersection_of([
            some("BFO:0000050", ClassExpression::intersection_of([class("ZFA:2"), class("ZFA:3")])),
            class("ZFA:1"),
        ]);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn repeated_operands_collapse() {
        let a = ClassExpression::intersection_of([class("ZFA:1"), class("ZFA:2"), class("ZFA:1")]);
        let b = ClassExpression::intersection_of([class("ZFA:2"), class("ZFA:1")]);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn structurally_different_expressions_differ() {
        let single = ClassExpression::intersection_of([class("ZFA:1")]);
        assert_ne!(single.fingerprint(), class("ZFA:1").fingerprint());

        // the relation matters
        assert_ne!(
            some("BFO:0000052", class("ZFA:1")).fingerprint(),
            some("BFO:0000070", class("ZFA:1")).fingerprint()
        );

        // nesting matters
        let flat = ClassExpression::intersection_of([
            some("BFO:0000050", class("ZFA:1")),
            class("ZFA:2"),
        ]);
        let nested = some(
            "BFO:0000050",
            ClassExpression::intersection_of([class("ZFA:1"), class("ZFA:2")]),
        );
        assert_ne!(flat.fingerprint(), nested.fingerprint());

        // inheres in vs towards of the same entity
        let a = ClassExpression::intersection_of([
            class("PATO:1"),
            some("BFO:0000052", class("ZFA:1")),
            some("BFO:0000070", class("ZFA:2")),
        ]);
        let b = ClassExpression::intersection_of([
            class("PATO:1"),
            some("BFO:0000052", class("ZFA:2")),
            some("BFO:0000070", class("ZFA:1")),
        ]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let build = || {
            some(
                "BFO:0000051",
                ClassExpression::intersection_of([class("PATO:1"), some("BFO:0000052", class("ZFA:1"))]),
            )
        };
        assert_eq!(build().fingerprint(), build().fingerprint());
    }
}
