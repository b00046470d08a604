/// Errors that end an activation pass.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    /// The configured marker can not be turned into a selector.
    #[error("invalid activation marker {name:?}: {reason}")]
    InvalidMarker { name: String, reason: &'static str },
    /// The element source failed to run the marker query.
    #[error("element query failed: {0}")]
    Query(String),
    /// The browser environment is missing something activation needs, such
    /// as the global window or document.
    #[error("browser environment unavailable: {0}")]
    Environment(String),
    /// A component failed to construct.
    ///
    /// `index` is the position of the element in document order.
    #[error("component construction failed for element #{index}: {source}")]
    Construction {
        index: usize,
        #[source]
        source: ConstructError,
    },
}

/// The error a component factory reports for a single element.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConstructError {
    message: String,
}

impl ConstructError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ConstructError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ConstructError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<wasm_bindgen::JsValue> for ConstructError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::new(js_message(&value))
    }
}

/// Best effort human readable text for a thrown Javascript value.
pub(crate) fn js_message(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(message) = value.as_string() {
        message
    } else if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        format!("{}: {}", String::from(err.name()), String::from(err.message()))
    } else {
        format!("{:?}", value)
    }
}

impl From<ConstructError> for wasm_bindgen::JsValue {
    fn from(err: ConstructError) -> Self {
        js_sys::Error::new(&err.message).into()
    }
}

impl From<MountError> for wasm_bindgen::JsValue {
    fn from(err: MountError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
