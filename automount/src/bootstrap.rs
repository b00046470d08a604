use crate::{
    activate::{activate_with, Activation},
    config::Config,
    error::MountError,
    factory::Factory,
    source::ElementSource,
};

/// Lifecycle of a [`Bootstrapper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// The ready signal has not fired yet.
    Idle,
    /// The activation pass has run.
    Activated,
}

/// Runs the activation pass once, when the document signals that its
/// structure is ready.
///
/// The bootstrapper holds no components: every instance is handed back to
/// the caller of [`Bootstrapper::on_ready`].
#[derive(Debug)]
pub struct Bootstrapper {
    config: Config,
    state: State,
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Bootstrapper {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_activated(&self) -> bool {
        self.state == State::Activated
    }

    /// Handle the ready signal.
    ///
    /// The first call runs the activation pass and moves to
    /// [`State::Activated`], whether or not the pass succeeded. A failed pass
    /// is not retried.
    ///
    /// Later calls return `Ok(None)` without touching the source or the
    /// factory, unless the duplicate guard was disabled in the [`Config`], in
    /// which case every call runs a full pass again.
    pub fn on_ready<S, F>(
        &mut self,
        source: &S,
        factory: &mut F,
    ) -> Result<Option<Activation<F::Component>>, MountError>
    where
        S: ElementSource + ?Sized,
        F: Factory<S::Element>,
    {
        if self.state == State::Activated {
            if self.config.guards_duplicates() {
                tracing::warn!(
                    marker = %self.config.marker(),
                    "ready signal received after activation, ignoring"
                );
                return Ok(None);
            }
            tracing::warn!(
                marker = %self.config.marker(),
                "ready signal received after activation, activating again"
            );
        }

        self.state = State::Activated;
        activate_with(source, factory, &self.config).map(Some)
    }

    /// Return to [`State::Idle`].
    ///
    /// Pages never need this. It exists so tests can run several activation
    /// cycles against one bootstrapper.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}
