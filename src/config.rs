use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime configuration of the border agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Upper bound of a single reactor wait, in milliseconds.
    pub poll_timeout_ms: u64,

    /// How long a host update may wait for publication results, in
    /// milliseconds. `None` leaves the decision to the stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_timeout_ms: Option<u64>,

    /// Start the advertising proxy right away instead of waiting for the
    /// stack to report it is attached.
    pub start_proxy: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 10_000,
            update_timeout_ms: Some(10_000),
            start_proxy: true,
        }
    }
}

impl AgentConfig {
    /// Layered configuration sources, later ones overriding earlier ones:
    /// defaults, `border-agent.toml`, `border-agent.json`, then
    /// `BORDER_AGENT_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AgentConfig::default()))
            .merge(Toml::file("border-agent.toml"))
            .merge(Json::file("border-agent.json"))
            .merge(Env::prefixed("BORDER_AGENT_"))
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::figment()
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn update_timeout(&self) -> Option<Duration> {
        self.update_timeout_ms.map(Duration::from_millis)
    }
}
