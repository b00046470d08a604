use crate::error::ConstructError;

/// Builds one component for one element.
///
/// The factory receives the matched element and nothing else: no index, no
/// total count, no configuration. Everything a component needs has to be
/// read from the element itself.
///
/// Any `FnMut(E) -> Result<C, Err>` closure is a factory, as long as `Err`
/// converts into a [`ConstructError`].
pub trait Factory<E> {
    type Component;

    fn construct(&mut self, element: E) -> Result<Self::Component, ConstructError>;
}

impl<E, C, Err, F> Factory<E> for F
where
    F: FnMut(E) -> Result<C, Err>,
    Err: Into<ConstructError>,
{
    type Component = C;

    fn construct(&mut self, element: E) -> Result<C, ConstructError> {
        self(element).map_err(Into::into)
    }
}
