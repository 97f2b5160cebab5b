//! nginx configuration rendering.

use std::collections::HashSet;

use crate::discovery::model::BackendRoute;

const UPSTREAM_HEADER: &str = "\nupstream backend {\n";

const PASSTHROUGH_FOOTER: &str = "
}

server {
\tlocation / {
\t\tproxy_pass http://backend;
\t}
}";

/// Render routes into an nginx config with one `server` line per distinct
/// `address:port`, in input order. The first occurrence of a pair wins.
pub fn render(routes: &[BackendRoute]) -> Vec<u8> {
    let mut config = String::from(UPSTREAM_HEADER);
    let mut emitted = HashSet::with_capacity(routes.len());

    for route in routes {
        let addr = route.addr();
        if !emitted.insert(addr.clone()) {
            continue;
        }
        config.push_str("\tserver ");
        config.push_str(&addr);
        config.push_str(";\n");
    }

    config.push_str(PASSTHROUGH_FOOTER);
    config.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(routes: &[BackendRoute]) -> String {
        String::from_utf8(render(routes)).unwrap()
    }

    #[test]
    fn test_empty_routes() {
        assert_eq!(
            rendered(&[]),
            "
upstream backend {

}

server {
\tlocation / {
\t\tproxy_pass http://backend;
\t}
}"
        );
    }

    #[test]
    fn test_single_route() {
        assert_eq!(
            rendered(&[BackendRoute::new("WEB_1", "127.0.0.1", "80")]),
            "
upstream backend {
\tserver 127.0.0.1:80;

}

server {
\tlocation / {
\t\tproxy_pass http://backend;
\t}
}"
        );
    }

    #[test]
    fn test_duplicates_collapse_to_first() {
        let config = rendered(&[
            BackendRoute::new("WEB_1", "127.0.0.0", "80"),
            BackendRoute::new("WEB_1", "127.0.0.0", "80"),
            BackendRoute::new("WEB_2", "127.0.0.1", "81"),
        ]);
        assert_eq!(
            config,
            "
upstream backend {
\tserver 127.0.0.0:80;
\tserver 127.0.0.1:81;

}

server {
\tlocation / {
\t\tproxy_pass http://backend;
\t}
}"
        );
    }

    #[test]
    fn test_dedup_ignores_container_name() {
        let config = rendered(&[
            BackendRoute::new("WEB_1", "10.0.0.1", "80"),
            BackendRoute::new("WEB_2", "10.0.0.1", "80"),
        ]);
        assert_eq!(config.matches("\tserver ").count(), 1);
    }

    #[test]
    fn test_same_address_different_ports_are_kept() {
        let config = rendered(&[
            BackendRoute::new("WEB_1", "10.0.0.1", "80"),
            BackendRoute::new("WEB_2", "10.0.0.1", "81"),
        ]);
        assert!(config.contains("\tserver 10.0.0.1:80;\n\tserver 10.0.0.1:81;\n"));
    }

    #[test]
    fn test_input_order_is_kept() {
        let config = rendered(&[
            BackendRoute::new("WEB_2", "10.0.0.2", "80"),
            BackendRoute::new("WEB_1", "10.0.0.1", "80"),
        ]);
        assert!(config.contains("\tserver 10.0.0.2:80;\n\tserver 10.0.0.1:80;\n"));
    }

    #[test]
    fn test_partial_routes() {
        let config = rendered(&[
            BackendRoute::new("WEB_1", "", "80"),
            BackendRoute::new("WEB_2", "10.0.0.2", ""),
        ]);
        assert!(config.contains("\tserver :80;\n\tserver 10.0.0.2:;\n"));
    }

    #[test]
    fn test_render_is_reproducible() {
        let routes = vec![
            BackendRoute::new("WEB_1", "10.0.0.1", "80"),
            BackendRoute::new("WEB_2", "10.0.0.2", "80"),
        ];
        assert_eq!(render(&routes), render(&routes));
    }
}
