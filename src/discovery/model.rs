//! Discovery data types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A remote service descriptor location found in the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiEndpoint {
    /// Key prefix before `_TUTUM_API_URL` (e.g. `WEB`).
    pub service_name: String,
    /// Full descriptor URL, taken verbatim from the variable's value.
    pub url: String,
}

/// One reachable backend instance belonging to a service.
///
/// Either half may be empty when the descriptor only exposed the other one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackendRoute {
    pub container_name: String,
    pub address: String,
    pub port: String,
}

impl BackendRoute {
    pub fn new(
        container_name: impl Into<String>,
        address: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            container_name: container_name.into(),
            address: address.into(),
            port: port.into(),
        }
    }

    /// `address:port`, used both as the rendered value and the dedup key.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// The part of a fetched service document the reloader cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceDescriptor {
    #[serde(default)]
    pub link_variables: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_always_has_separator() {
        assert_eq!(BackendRoute::new("WEB_1", "127.0.0.1", "80").addr(), "127.0.0.1:80");
        assert_eq!(BackendRoute::new("WEB_1", "", "80").addr(), ":80");
        assert_eq!(BackendRoute::new("WEB_1", "127.0.0.1", "").addr(), "127.0.0.1:");
    }

    #[test]
    fn test_descriptor_ignores_unknown_fields() {
        let json = r#"{
            "name": "wordpress-stackable",
            "current_num_containers": 2,
            "link_variables": {
                "WEB_1_PORT_80_TCP_ADDR": "10.0.0.1",
                "WEB_1_PORT_80_TCP_PORT": "49153"
            }
        }"#;
        let descriptor: ServiceDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.link_variables.len(), 2);
        assert_eq!(descriptor.link_variables["WEB_1_PORT_80_TCP_PORT"], "49153");
    }

    #[test]
    fn test_descriptor_without_link_variables() {
        let descriptor: ServiceDescriptor = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert!(descriptor.link_variables.is_empty());
    }
}
