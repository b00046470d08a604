//! Helpers for running activation in the browser.

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{prelude::Closure, JsCast, JsValue};

use crate::{
    bootstrap::{Bootstrapper, State},
    config::Config,
    error::{js_message, ConstructError, MountError},
    factory::Factory,
    marker::Marker,
    source::ElementSource,
};

/// Name of the event signalling that the document structure was parsed.
///
/// This is deliberately not `load`, which also waits for images, styles and
/// other subresources.
pub const CONTENT_LOADED: &str = "DOMContentLoaded";

/// A component that mounts itself onto a single element.
///
/// `mount` is the whole construction contract: the element is the only
/// argument, and the component is responsible for reading its own
/// configuration from the element's attributes and children.
pub trait Component: Sized + 'static {
    fn mount(element: web_sys::Element) -> Result<Self, ConstructError>;
}

fn window() -> Result<web_sys::Window, MountError> {
    web_sys::window().ok_or_else(|| MountError::Environment("no global window".to_string()))
}

fn document() -> Result<web_sys::Document, MountError> {
    window()?
        .document()
        .ok_or_else(|| MountError::Environment("window has no document".to_string()))
}

#[derive(Clone, Debug)]
enum Root {
    Document(web_sys::Document),
    Element(web_sys::Element),
}

/// Queries a live DOM tree with `querySelectorAll`.
#[derive(Clone, Debug)]
pub struct DocumentSource {
    root: Root,
}

impl DocumentSource {
    pub fn new(document: web_sys::Document) -> Self {
        Self {
            root: Root::Document(document),
        }
    }

    /// Only consider the descendants of `root`. The root itself is never a
    /// candidate.
    pub fn subtree(root: web_sys::Element) -> Self {
        Self {
            root: Root::Element(root),
        }
    }

    /// The document of the current window.
    pub fn current() -> Result<Self, MountError> {
        document().map(Self::new)
    }
}

impl ElementSource for DocumentSource {
    type Element = web_sys::Element;

    fn query(&self, marker: &Marker) -> Result<Vec<web_sys::Element>, MountError> {
        let selector = marker.selector();
        let list = match &self.root {
            Root::Document(doc) => doc.query_selector_all(&selector),
            Root::Element(elem) => elem.query_selector_all(&selector),
        }
        .map_err(|err| MountError::Query(js_message(&err)))?;

        // NodeList is in document order.
        let mut elements = Vec::with_capacity(list.length() as usize);
        for index in 0..list.length() {
            if let Some(elem) = list
                .item(index)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            {
                elements.push(elem);
            }
        }
        Ok(elements)
    }
}

type ReadyClosure = Closure<dyn FnMut() -> Result<(), JsValue>>;

/// Wrap a ready callback so that an `Err` is thrown to Javascript by
/// wasm-bindgen once the callback has returned.
fn ready_closure(
    mut callback: impl FnMut() -> Result<(), MountError> + 'static,
) -> ReadyClosure {
    Closure::wrap(Box::new(move || callback().map_err(JsValue::from))
        as Box<dyn FnMut() -> Result<(), JsValue>>)
}

enum Pending {
    Listener {
        target: web_sys::EventTarget,
        closure: ReadyClosure,
    },
    Timeout {
        window: web_sys::Window,
        id: i32,
        _closure: ReadyClosure,
    },
}

/// Keeps a ready callback registered.
///
/// Dropping the subscription unregisters the callback. Use
/// [`ReadySubscription::forget`] to keep it for the rest of the page
/// lifetime.
#[must_use]
pub struct ReadySubscription {
    pending: Pending,
}

impl ReadySubscription {
    /// Invoke `callback` every time `target` receives a `DOMContentLoaded`
    /// event.
    ///
    /// Browsers fire the event once per document. Repeated firings are
    /// passed through, guarding against them is up to the callback.
    ///
    /// An error returned by the callback is thrown as an uncaught Javascript
    /// exception from the event dispatch.
    pub fn listen(
        target: web_sys::EventTarget,
        callback: impl FnMut() -> Result<(), MountError> + 'static,
    ) -> Result<Self, MountError> {
        let closure = ready_closure(callback);
        target
            .add_event_listener_with_callback(CONTENT_LOADED, closure.as_ref().unchecked_ref())
            .map_err(|err| MountError::Environment(js_message(&err)))?;

        Ok(Self {
            pending: Pending::Listener { target, closure },
        })
    }

    /// Invoke `callback` from a fresh task, so that it never runs inside the
    /// script evaluation that registered it.
    fn deferred(
        window: web_sys::Window,
        callback: impl FnMut() -> Result<(), MountError> + 'static,
    ) -> Result<Self, MountError> {
        let closure = ready_closure(callback);
        let id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                0,
            )
            .map_err(|err| MountError::Environment(js_message(&err)))?;

        Ok(Self {
            pending: Pending::Timeout {
                window,
                id,
                _closure: closure,
            },
        })
    }

    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for ReadySubscription {
    fn drop(&mut self) {
        match &self.pending {
            Pending::Listener { target, closure } => {
                if let Err(_err) = target.remove_event_listener_with_callback(
                    CONTENT_LOADED,
                    closure.as_ref().unchecked_ref(),
                ) {
                    tracing::error!("Could not remove DOMContentLoaded listener");
                }
            }
            Pending::Timeout { window, id, .. } => {
                window.clear_timeout_with_handle(*id);
            }
        }
    }
}

/// Run `callback` once the document structure has been parsed.
///
/// While the document is still loading this waits for `DOMContentLoaded`.
/// If parsing already finished (the script was loaded late or
/// asynchronously), the event will never fire again, so the callback is
/// scheduled as a new task instead.
pub fn on_content_loaded(
    callback: impl FnMut() -> Result<(), MountError> + 'static,
) -> Result<ReadySubscription, MountError> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| MountError::Environment("window has no document".to_string()))?;

    if document.ready_state() == "loading" {
        tracing::trace!("document still loading, waiting for {}", CONTENT_LOADED);
        ReadySubscription::listen(window.into(), callback)
    } else {
        tracing::trace!("document already parsed, deferring activation");
        ReadySubscription::deferred(window, callback)
    }
}

/// Builder for a browser activation.
///
/// ```rust,no_run
/// use automount::{web::Launcher, Config, ConstructError};
///
/// Launcher::new(|elem: web_sys::Element| -> Result<(), ConstructError> {
///     elem.set_text_content(Some("mounted"));
///     Ok(())
/// })
/// .with_config(Config::default())
/// .start()
/// .unwrap()
/// .forget();
/// ```
pub struct Launcher<F> {
    config: Config,
    factory: F,
    root: Option<web_sys::Element>,
    trigger: Option<web_sys::EventTarget>,
}

impl<F> Launcher<F>
where
    F: Factory<web_sys::Element> + 'static,
{
    pub fn new(factory: F) -> Self {
        Self {
            config: Config::default(),
            factory,
            root: None,
            trigger: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Scan the descendants of `root` instead of the whole document.
    pub fn with_root(mut self, root: web_sys::Element) -> Self {
        self.root = Some(root);
        self
    }

    /// Wait for `DOMContentLoaded` on `target` instead of the window,
    /// regardless of the document ready state.
    pub fn with_trigger(mut self, target: web_sys::EventTarget) -> Self {
        self.trigger = Some(target);
        self
    }

    /// Register the ready callback.
    ///
    /// Nothing is constructed here. The activation pass only runs once the
    /// ready signal fires. Constructed components are leaked on purpose:
    /// their lifetime is tied to the element, not to the launcher.
    ///
    /// A pass that fails (under [`crate::FailurePolicy::FailFast`], or
    /// because the query failed) is thrown to Javascript as an uncaught
    /// error.
    pub fn start(self) -> Result<Launch, MountError> {
        let source = match self.root {
            Some(root) => DocumentSource::subtree(root),
            None => DocumentSource::current()?,
        };
        let bootstrapper = Rc::new(RefCell::new(Bootstrapper::new(self.config)));

        let boot = bootstrapper.clone();
        let mut factory = self.factory;
        let callback = move || {
            let outcome = boot.borrow_mut().on_ready(&source, &mut factory);
            match outcome {
                Ok(Some(report)) => {
                    tracing::debug!(
                        constructed = report.instances.len(),
                        failed = report.failures.len(),
                        "components mounted"
                    );
                    std::mem::forget(report.instances);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(err) => {
                    tracing::error!(error = %err, "activation failed");
                    Err(err)
                }
            }
        };

        let ready = match self.trigger {
            Some(target) => ReadySubscription::listen(target, callback)?,
            None => on_content_loaded(callback)?,
        };

        Ok(Launch {
            bootstrapper,
            _ready: ready,
        })
    }
}

/// A registered activation.
///
/// Dropping it before the ready signal fires cancels the activation.
#[must_use]
pub struct Launch {
    bootstrapper: Rc<RefCell<Bootstrapper>>,
    _ready: ReadySubscription,
}

impl Launch {
    pub fn state(&self) -> State {
        self.bootstrapper.borrow().state()
    }

    /// Return the bootstrapper to [`State::Idle`], so the next ready signal
    /// activates again.
    pub fn reset(&self) {
        self.bootstrapper.borrow_mut().reset();
    }

    /// Keep the activation registered for the rest of the page lifetime.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

/// Mount `C` onto every `[data-rivus]` element once the document is ready.
pub fn launch<C: Component>() -> Result<(), MountError> {
    launch_with::<C>(Config::default())
}

/// Like [`launch`], with a custom marker or failure policy.
pub fn launch_with<C: Component>(config: Config) -> Result<(), MountError> {
    Launcher::new(C::mount).with_config(config).start()?.forget();
    Ok(())
}
