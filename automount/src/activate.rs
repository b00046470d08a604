use crate::{
    config::{Config, FailurePolicy},
    error::{ConstructError, MountError},
    factory::Factory,
    marker::Marker,
    source::ElementSource,
};

/// The outcome of a completed activation pass.
#[derive(Debug)]
pub struct Activation<C> {
    /// Constructed components, in the document order of their elements.
    pub instances: Vec<C>,
    /// Elements whose component failed to construct, by document index.
    ///
    /// Always empty under [`FailurePolicy::FailFast`], which returns the
    /// first failure as an error instead.
    pub failures: Vec<(usize, ConstructError)>,
}

impl<C> Activation<C> {
    /// Number of elements the pass handed to the factory.
    pub fn attempted(&self) -> usize {
        self.instances.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Construct one component per element carrying `marker`, stopping at the
/// first failure.
///
/// The factory is invoked exactly once per matched element, in document
/// order. Elements after a failing one are never attempted.
pub fn activate_all<S, F>(
    source: &S,
    factory: &mut F,
    marker: &Marker,
) -> Result<Vec<F::Component>, MountError>
where
    S: ElementSource + ?Sized,
    F: Factory<S::Element>,
{
    let report = run(source, factory, marker, FailurePolicy::FailFast)?;
    Ok(report.instances)
}

/// Run an activation pass with the marker and failure policy from `config`.
pub fn activate_with<S, F>(
    source: &S,
    factory: &mut F,
    config: &Config,
) -> Result<Activation<F::Component>, MountError>
where
    S: ElementSource + ?Sized,
    F: Factory<S::Element>,
{
    run(source, factory, config.marker(), config.policy())
}

fn run<S, F>(
    source: &S,
    factory: &mut F,
    marker: &Marker,
    policy: FailurePolicy,
) -> Result<Activation<F::Component>, MountError>
where
    S: ElementSource + ?Sized,
    F: Factory<S::Element>,
{
    let span = tracing::debug_span!("activate", marker = %marker, ?policy);
    let _enter = span.enter();

    let elements = source.query(marker)?;
    tracing::trace!(candidates = elements.len(), "queried candidate elements");

    let mut report = Activation {
        instances: Vec::with_capacity(elements.len()),
        failures: Vec::new(),
    };

    for (index, element) in elements.into_iter().enumerate() {
        match factory.construct(element) {
            Ok(component) => report.instances.push(component),
            Err(source) => match policy {
                FailurePolicy::FailFast => {
                    tracing::error!(index, error = %source, "component construction failed, aborting");
                    return Err(MountError::Construction { index, source });
                }
                FailurePolicy::BestEffort => {
                    tracing::error!(index, error = %source, "component construction failed");
                    report.failures.push((index, source));
                }
            },
        }
    }

    tracing::debug!(
        constructed = report.instances.len(),
        failed = report.failures.len(),
        "activation pass finished"
    );
    Ok(report)
}
