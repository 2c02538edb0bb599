use crate::structs::catalog::ResolvedService;

/// What the core hands to the presentation layer for each service.
///
/// How frames and controls are materialized is the collaborator's
/// business; the core only guarantees this data.
#[derive(Debug, Clone, Copy)]
pub struct ServiceHandoff<'a> {
    pub id: &'a str,
    pub endpoint: &'a str,
    pub icon: Option<&'a str>,
    pub newtab: bool,
}

impl<'a> From<&'a ResolvedService> for ServiceHandoff<'a> {
    fn from(service: &'a ResolvedService) -> Self {
        ServiceHandoff {
            id: &service.id,
            endpoint: &service.endpoint,
            icon: service.icon.as_deref(),
            newtab: service.newtab.unwrap_or(false),
        }
    }
}

/// Contract for the presentation layer: mount one displayable frame and
/// one selectable control per service, switch which frame is shown, and
/// open endpoints in a new browsing context on request.
pub trait RenderTarget {
    fn mount_service(&mut self, group: &str, handoff: ServiceHandoff<'_>);
    fn show_service(&mut self, id: &str);
    fn open_new_context(&mut self, endpoint: &str);
}
