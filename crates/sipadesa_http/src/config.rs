use sipadesa_core::AgeRule;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Runtime knobs for the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Delay added before every storage call, mimicking a remote backend.
    pub simulated_latency: Option<Duration>,
    /// Age rule for the ID-card eligibility statistic.
    pub age_rule: AgeRule,
}

impl ServerConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            simulated_latency: None,
            age_rule: AgeRule::default(),
        }
    }

    pub fn with_simulated_latency_ms(mut self, millis: u64) -> Self {
        self.simulated_latency = (millis > 0).then(|| Duration::from_millis(millis));
        self
    }

    pub fn with_age_rule(mut self, rule: AgeRule) -> Self {
        self.age_rule = rule;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}
