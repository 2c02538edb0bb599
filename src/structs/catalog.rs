use crate::endpoint::build_endpoint;

use super::config::{Config, ServiceSpec};

/// A service with its endpoint fully resolved. Immutable after startup.
#[derive(Debug, Clone)]
pub struct ResolvedService {
    /// Normalized id: the lower-cased display name. Used for lookups and
    /// for the shareable URL state.
    pub id: String,
    pub name: String,
    pub endpoint: String,
    pub icon: Option<String>,
    pub newtab: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub services: Vec<ResolvedService>,
}

/// The resolved service catalog, in document order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub groups: Vec<Group>,
}

impl Catalog {
    /// Resolves every configured service against the backend host picked
    /// for this client.
    pub fn from_config(config: &Config, resolved_host: &str) -> Catalog {
        let groups = config
            .services
            .iter()
            .map(|(group_name, members)| Group {
                name: group_name.clone(),
                services: members
                    .iter()
                    .map(|(service_name, overlays)| {
                        let spec = ServiceSpec::merged(overlays);
                        ResolvedService {
                            id: service_name.to_lowercase(),
                            name: service_name.clone(),
                            endpoint: build_endpoint(&spec, service_name, resolved_host),
                            icon: spec.icon,
                            newtab: spec.newtab,
                        }
                    })
                    .collect(),
            })
            .collect();

        Catalog { groups }
    }

    /// All services, flattened in group order.
    pub fn services(&self) -> impl Iterator<Item = &ResolvedService> {
        self.groups.iter().flat_map(|group| group.services.iter())
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedService> {
        self.services().find(|service| service.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.services.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        serde_yaml::from_str(
            r#"
services:
  Media:
    Jellyfin:
      - port: 8096
      - icon: icons/jellyfin.png
    Mail: []
  External:
    Docs:
      - host: "https://docs.example.com"
      - newtab: true
"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_services_in_document_order() {
        let catalog = Catalog::from_config(&config(), "10.0.0.5");

        let ids: Vec<&str> = catalog.services().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["jellyfin", "mail", "docs"]);

        let jellyfin = catalog.get("jellyfin").unwrap();
        assert_eq!(jellyfin.name, "Jellyfin");
        assert_eq!(jellyfin.endpoint, "http://10.0.0.5:8096");
        assert_eq!(jellyfin.icon.as_deref(), Some("icons/jellyfin.png"));
        assert_eq!(jellyfin.newtab, None);

        // Bare spec falls back to the reverse-proxy path, keyed by the
        // display name as written.
        assert_eq!(catalog.get("mail").unwrap().endpoint, "http://10.0.0.5/Mail");

        let docs = catalog.get("docs").unwrap();
        assert_eq!(docs.endpoint, "https://docs.example.com");
        assert_eq!(docs.newtab, Some(true));
    }

    #[test]
    fn lookup_is_by_normalized_id() {
        let catalog = Catalog::from_config(&config(), "10.0.0.5");
        assert!(catalog.get("jellyfin").is_some());
        assert!(catalog.get("Jellyfin").is_none());
    }

    #[test]
    fn empty_config_yields_empty_catalog() {
        let catalog = Catalog::from_config(&Config::default(), "10.0.0.5");
        assert!(catalog.is_empty());
        assert!(catalog.get("anything").is_none());
    }
}
