//! Resource table for the relay handler
//!
//! Maps each gateway resource to its upstream path segment and the verbs it
//! offers. Adding a resource is one entry here; no new handler code.

use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Self::List | Self::Get => Method::GET,
            Self::Create => Method::POST,
            Self::Update => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    pub fn requires_id(self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Delete)
    }

    /// Only POST and PUT forward the inbound body
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

const CRUD: &[Verb] = &[Verb::List, Verb::Get, Verb::Create, Verb::Update, Verb::Delete];
const READ_ONLY: &[Verb] = &[Verb::List, Verb::Get];

#[derive(Debug, PartialEq, Eq)]
pub struct Resource {
    /// Name in the gateway path (`/api/{name}`)
    pub name: &'static str,
    /// Segment below the upstream base URL
    pub upstream_path: &'static str,
    pub verbs: &'static [Verb],
}

pub const RESOURCES: &[Resource] = &[
    Resource {
        name: "rooms",
        upstream_path: "rooms",
        verbs: CRUD,
    },
    Resource {
        name: "bookings",
        upstream_path: "bookings",
        verbs: CRUD,
    },
    Resource {
        name: "categories",
        upstream_path: "categories",
        verbs: READ_ONLY,
    },
];

impl Resource {
    pub fn lookup(name: &str) -> Option<&'static Resource> {
        RESOURCES.iter().find(|r| r.name == name)
    }

    pub fn supports(&self, verb: Verb) -> bool {
        self.verbs.contains(&verb)
    }

    /// Upstream path segments: the resource, then the identifier if any
    pub fn segments<'a>(&self, id: Option<&'a str>) -> Vec<&'a str> {
        let mut segments = vec![self.upstream_path];
        segments.extend(id);
        segments
    }
}
