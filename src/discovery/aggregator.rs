//! Link variable aggregation.
//!
//! # Responsibilities
//! - Locate the link filter (e.g. `_PORT_80_TCP`) inside each key
//! - Group `{CONTAINER}{FILTER}_ADDR` / `{CONTAINER}{FILTER}_PORT` pairs per container
//! - Emit routes sorted by container name
//!
//! # Design Decisions
//! - Output order never depends on map iteration order; the renderer
//!   deduplicates in this order, so it has to be reproducible
//! - Partial data is kept: a container with only `_ADDR` or only `_PORT`
//!   yields a route with the other field empty
//! - Other remainders (`_PROTO`, bare filter) never create a route

use std::collections::{BTreeMap, HashMap};

use crate::discovery::model::BackendRoute;

const ADDR_SUFFIX: &str = "_ADDR";
const PORT_SUFFIX: &str = "_PORT";

/// Build the link filter for the proxy's listening port.
pub fn link_filter(port: &str) -> String {
    format!("_PORT_{}_TCP", port)
}

/// Group link variables into one route per container, sorted by container name.
pub fn aggregate(suffix_filter: &str, link_variables: &HashMap<String, String>) -> Vec<BackendRoute> {
    let mut containers: BTreeMap<&str, BackendRoute> = BTreeMap::new();

    for (key, value) in link_variables {
        let Some(index) = key.find(suffix_filter) else {
            continue;
        };

        let container_name = &key[..index];
        let remainder = &key[index + suffix_filter.len()..];

        let route = match remainder {
            ADDR_SUFFIX | PORT_SUFFIX => containers
                .entry(container_name)
                .or_insert_with(|| BackendRoute::new(container_name, "", "")),
            _ => continue,
        };

        if remainder == ADDR_SUFFIX {
            route.address = value.clone();
        } else {
            route.port = value.clone();
        }
    }

    containers.into_values().collect()
}
