//! Declarative component activation.
//!
//! Markup opts an element in by carrying the activation marker attribute
//! (`data-rivus` unless configured otherwise):
//!
//! ```html
//! <section data-rivus>...</section>
//! ```
//!
//! Once the document structure is parsed, every marked element is handed,
//! in document order, to a component factory which builds exactly one
//! component for it. See [`web::launch`] for the browser entry point and
//! [`activate_all`] for the underlying pass.

pub mod activate;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod factory;
pub mod marker;
pub mod source;
pub mod web;

pub use self::{
    activate::{activate_all, activate_with, Activation},
    bootstrap::{Bootstrapper, State},
    config::{Config, FailurePolicy},
    error::{ConstructError, MountError},
    factory::Factory,
    marker::{Marker, DEFAULT_MARKER},
    source::{ElementSource, StaticElement, StaticSource},
    web::{launch, launch_with, Component},
};
