use url::Url;

use crate::structs::config::ServiceSpec;

/// Schemes accepted as a full-URL override in a service's `host` field.
const OVERRIDE_SCHEMES: [&str; 2] = ["http", "https"];

/// Builds the URL a service's frame loads. Pure: identical inputs always
/// produce the same endpoint.
///
/// Priority order:
/// 1. `host` is itself a full URL -> used verbatim, everything else ignored.
/// 2. No host, port or path -> `http://{resolved_host}/{service_name}`, the
///    reverse-proxy convention where each service hangs off the shared host.
/// 3. Otherwise compose from host (or the resolved host), `:port` and `/path`.
pub fn build_endpoint(spec: &ServiceSpec, service_name: &str, resolved_host: &str) -> String {
    if let Some(host) = spec.host.as_deref() {
        if is_full_url(host) {
            return host.to_string();
        }
    }

    if spec.host.is_none() && spec.port.is_none() && spec.path.is_none() {
        return format!("http://{resolved_host}/{service_name}");
    }

    let host = spec.host.as_deref().unwrap_or(resolved_host);
    let mut endpoint = format!("http://{host}");
    if let Some(port) = spec.port {
        endpoint.push(':');
        endpoint.push_str(&port.to_string());
    }
    if let Some(path) = spec.path.as_deref() {
        endpoint.push('/');
        endpoint.push_str(path.trim_start_matches('/'));
    }

    endpoint
}

/// A `host` value counts as a full URL only when it parses with a scheme we
/// recognize. `Url::parse` alone is not enough: `grafana:3000` parses as a
/// URL with scheme `grafana`.
fn is_full_url(host: &str) -> bool {
    Url::parse(host)
        .map(|url| OVERRIDE_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false)
}
