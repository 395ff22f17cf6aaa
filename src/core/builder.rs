use std::sync::Arc;

use crate::{
    components::{ComponentRef, validate_all},
    config::ServiceConfig,
    error::LifecycleError,
    events::Bus,
    stats::StatsReporter,
    subscribers::Subscribe,
    tasks::{IdGenerator, RandomHexId},
};
use super::service::{Parts, Service, Slot};

/// Builder for a [`Service`] and its collaborators.
pub struct ServiceBuilder {
    cfg: ServiceConfig,
    components: Vec<Option<ComponentRef>>,
    stats: Option<Arc<dyn StatsReporter>>,
    ids: Option<Arc<dyn IdGenerator>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus: Option<Bus>,
}

impl ServiceBuilder {
    /// Creates a builder with the given configuration and no components.
    pub fn new(cfg: ServiceConfig) -> Self {
        Self {
            cfg,
            components: Vec::new(),
            stats: None,
            ids: None,
            subscribers: Vec::new(),
            bus: None,
        }
    }

    /// Appends components in registration order.
    pub fn with_components<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentRef>,
    {
        self.components.extend(components.into_iter().map(Some));
        self
    }

    /// Appends one component.
    pub fn with_component(mut self, component: ComponentRef) -> Self {
        self.components.push(Some(component));
        self
    }

    /// Appends a component that may be disabled (`None` is skipped).
    pub fn with_optional_component(mut self, component: Option<ComponentRef>) -> Self {
        self.components.push(component);
        self
    }

    /// Sets the stats reporter.
    ///
    /// It is attached at the start of `connect`, started once every component
    /// is ready and stopped after the task drain.
    pub fn with_stats(mut self, stats: Arc<dyn StatsReporter>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Replaces the default [`RandomHexId`] task id generator.
    pub fn with_id_generator(mut self, ids: impl IdGenerator) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Sets event subscribers.
    ///
    /// Each subscriber gets its own worker and bounded queue; they start
    /// receiving events on `connect`.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Publishes on an existing bus instead of creating one from
    /// [`ServiceConfig::bus_capacity`].
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Validates the components and builds the service.
    ///
    /// Fails with [`LifecycleError::Invalid`] on an empty or duplicate
    /// component name. No component is attached or started here.
    pub fn build(self) -> Result<Service, LifecycleError> {
        let components = validate_all(self.components)?;
        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));
        let slots = components
            .into_iter()
            .map(|component| Slot::new(component, &bus))
            .collect();

        Ok(Service::from_parts(Parts {
            cfg: self.cfg,
            bus,
            slots,
            stats: self.stats,
            ids: self
                .ids
                .unwrap_or_else(|| Arc::new(RandomHexId::default())),
            subscribers: self.subscribers,
        }))
    }
}

impl Service {
    /// Starts building a service.
    pub fn builder(cfg: ServiceConfig) -> ServiceBuilder {
        ServiceBuilder::new(cfg)
    }

    /// Builds a service from a component list; `None` entries are skipped.
    pub fn new(
        cfg: ServiceConfig,
        components: Vec<Option<ComponentRef>>,
    ) -> Result<Service, LifecycleError> {
        let mut builder = ServiceBuilder::new(cfg);
        builder.components = components;
        builder.build()
    }
}
