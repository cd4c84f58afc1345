use super::BorderAgent;
use crate::agent::{Publisher, Stack};
use crate::config::AgentConfig;
use crate::error::Result;

use std::rc::Rc;
use std::time::Duration;

/// Builder for configuring and creating a [`BorderAgent`].
///
/// # Examples
///
/// ```rust,ignore
/// let agent = AgentBuilder::from_config(&AgentConfig::load()?)
///     .poll_timeout(Duration::from_secs(1))
///     .build(stack, publisher)?;
/// ```
pub struct AgentBuilder {
    poll_timeout: Duration,
    update_timeout: Option<Duration>,
    start_proxy: bool,
}

impl AgentBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&AgentConfig::default())
    }

    /// Creates a builder from a loaded configuration.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            poll_timeout: config.poll_timeout(),
            update_timeout: config.update_timeout(),
            start_proxy: config.start_proxy,
        }
    }

    /// Sets the upper bound of a single reactor wait.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets how long a host update may wait for publication results.
    ///
    /// `None` only applies the timeout carried by each update, if any.
    pub fn update_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.update_timeout = timeout;
        self
    }

    /// Whether to start the advertising proxy right away.
    pub fn start_proxy(mut self, start: bool) -> Self {
        self.start_proxy = start;
        self
    }

    /// Builds the agent around the given collaborators.
    ///
    /// # Errors
    ///
    /// Fails when the reactor's wakeup pipe cannot be created.
    pub fn build(self, stack: Rc<dyn Stack>, publisher: Rc<dyn Publisher>) -> Result<BorderAgent> {
        BorderAgent::new(
            stack,
            publisher,
            self.poll_timeout,
            self.update_timeout,
            self.start_proxy,
        )
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
