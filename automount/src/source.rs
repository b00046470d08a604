use crate::{error::MountError, marker::Marker};

/// Something that can be queried for the elements carrying a marker.
///
/// Implementations must return matches in document order (depth-first,
/// top to bottom). The browser implementation is
/// [`crate::web::DocumentSource`]; [`StaticSource`] is a synthetic tree for
/// driving the activation pass without a DOM.
pub trait ElementSource {
    type Element;

    fn query(&self, marker: &Marker) -> Result<Vec<Self::Element>, MountError>;
}

impl<S: ElementSource + ?Sized> ElementSource for &S {
    type Element = S::Element;

    fn query(&self, marker: &Marker) -> Result<Vec<Self::Element>, MountError> {
        (**self).query(marker)
    }
}

/// A synthetic element in a [`StaticSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticElement<E> {
    attributes: Vec<(String, String)>,
    children: Vec<StaticElement<E>>,
    value: E,
}

impl<E> StaticElement<E> {
    pub fn new(value: E) -> Self {
        Self {
            attributes: Vec::new(),
            children: Vec::new(),
            value,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: StaticElement<E>) -> Self {
        self.children.push(child);
        self
    }

    pub fn value(&self) -> &E {
        &self.value
    }

    fn has_marker(&self, marker: &Marker) -> bool {
        self.attributes.iter().any(|(name, _)| marker.matches(name))
    }

    fn collect_into<'a>(&'a self, marker: &Marker, out: &mut Vec<&'a E>) {
        if self.has_marker(marker) {
            out.push(&self.value);
        }
        for child in &self.children {
            child.collect_into(marker, out);
        }
    }
}

/// An in-memory document: a list of top-level elements, each with an
/// arbitrary subtree.
///
/// Queries walk the tree depth-first, so the result order is the document
/// order the markup would have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticSource<E> {
    roots: Vec<StaticElement<E>>,
}

impl<E> Default for StaticSource<E> {
    fn default() -> Self {
        Self { roots: Vec::new() }
    }
}

impl<E> StaticSource<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, element: StaticElement<E>) -> Self {
        self.roots.push(element);
        self
    }

    pub fn push(&mut self, element: StaticElement<E>) {
        self.roots.push(element);
    }
}

impl<E> FromIterator<StaticElement<E>> for StaticSource<E> {
    fn from_iter<I: IntoIterator<Item = StaticElement<E>>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().collect(),
        }
    }
}

impl<E: Clone> ElementSource for StaticSource<E> {
    type Element = E;

    fn query(&self, marker: &Marker) -> Result<Vec<E>, MountError> {
        let mut found = Vec::new();
        for root in &self.roots {
            root.collect_into(marker, &mut found);
        }
        Ok(found.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(name: &'static str) -> StaticElement<&'static str> {
        StaticElement::new(name)
    }

    #[test]
    fn test_query_returns_marked_elements_in_document_order() {
        let source = StaticSource::new()
            .and(
                el("body")
                    .child(el("header").attr("data-rivus", ""))
                    .child(
                        el("main")
                            .attr("data-rivus", "outer")
                            .child(el("nested").attr("data-rivus", "inner")),
                    ),
            )
            .and(el("footer").attr("data-rivus", "x"));

        let found = source.query(&Marker::default()).unwrap();
        assert_eq!(found, vec!["header", "main", "nested", "footer"]);
    }

    #[test]
    fn test_query_ignores_other_attributes() {
        let source: StaticSource<_> = vec![
            el("a").attr("data-rivusx", ""),
            el("b").attr("class", "data-rivus"),
            el("c").attr("DATA-RIVUS", ""),
        ]
        .into_iter()
        .collect();

        let found = source.query(&Marker::default()).unwrap();
        assert_eq!(found, vec!["c"]);
    }

    #[test]
    fn test_query_custom_marker() {
        let source = StaticSource::new()
            .and(el("a").attr("data-rivus", ""))
            .and(el("b").attr("data-widget", ""));

        let marker = Marker::new("data-widget").unwrap();
        assert_eq!(source.query(&marker).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_element_value() {
        let elem = el("header").attr("data-rivus", "").child(el("nav"));
        assert_eq!(*elem.value(), "header");
    }

    #[test]
    fn test_empty_source() {
        let source = StaticSource::<u32>::new();
        assert!(source.query(&Marker::default()).unwrap().is_empty());
    }
}
