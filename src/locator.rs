//! Resource identifiers from Deep Intelligence URLs
//!
//! Two URL forms are understood:
//!
//! ```text
//! https://app.deepint.net/o/<org>/workspace?ws=<ws>&s=<kind>&i=<id>   (web)
//! https://app.deepint.net/api/v1/workspace/<ws>/<kind>/<id>           (API)
//! ```
//!
//! API URLs carry no organization; callers supply it separately.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Kind of object a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Data source
    Source,
    /// Task
    Task,
    /// Alert
    Alert,
    /// Model
    Model,
    /// Dashboard
    Dashboard,
    /// Visualization
    Visualization,
}

impl ResourceKind {
    /// Singular name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Source => "source",
            ResourceKind::Task => "task",
            ResourceKind::Alert => "alert",
            ResourceKind::Model => "model",
            ResourceKind::Dashboard => "dashboard",
            ResourceKind::Visualization => "visualization",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    /// Accepts singular and plural path segments
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "source" | "sources" => Ok(ResourceKind::Source),
            "task" | "tasks" => Ok(ResourceKind::Task),
            "alert" | "alerts" => Ok(ResourceKind::Alert),
            "model" | "models" => Ok(ResourceKind::Model),
            "dashboard" | "dashboards" => Ok(ResourceKind::Dashboard),
            "visualization" | "visualizations" => Ok(ResourceKind::Visualization),
            other => Err(Error::validation(
                "URL_UNKNOWN_RESOURCE",
                format!("Unknown resource kind '{other}' in URL"),
            )),
        }
    }
}

/// An object inside a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    /// Object kind
    pub kind: ResourceKind,
    /// Object id
    pub id: String,
}

/// Identifiers found in a URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceLocator {
    /// Organization id (web URLs only)
    pub organization_id: Option<String>,
    /// Workspace id
    pub workspace_id: Option<String>,
    /// Object inside the workspace
    pub resource: Option<ResourceRef>,
}

impl ResourceLocator {
    /// Organization from the URL, else `fallback`
    pub fn organization_or(&self, fallback: Option<&str>) -> Result<String> {
        self.organization_id
            .clone()
            .or_else(|| fallback.map(String::from))
            .ok_or_else(|| missing("organization_id"))
    }

    /// Workspace id, required
    pub fn require_workspace(&self) -> Result<&str> {
        self.workspace_id
            .as_deref()
            .ok_or_else(|| missing("workspace_id"))
    }

    /// Object id, required to be of `kind`
    pub fn require_resource(&self, kind: ResourceKind) -> Result<&str> {
        match &self.resource {
            Some(r) if r.kind == kind => Ok(&r.id),
            Some(r) => Err(Error::validation(
                "URL_MISSING_FIELD",
                format!("URL points at a {}, expected a {}", r.kind, kind),
            )),
            None => Err(missing(&format!("{kind}_id"))),
        }
    }
}

fn missing(field: &str) -> Error {
    Error::validation(
        "URL_MISSING_FIELD",
        format!("Field {field} must be in the URL to build the object"),
    )
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Extract identifiers from a web or API URL.
///
/// Pieces absent from the URL are left as `None`; an unrecognised object
/// kind is an error.
pub fn parse_url(input: &str) -> Result<ResourceLocator> {
    let url = Url::parse(input.trim())?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let mut locator = ResourceLocator::default();

    match segments.as_slice() {
        ["api", _version, "workspace", rest @ ..] => {
            locator.workspace_id = non_empty(rest.first().copied());
            if let [_, kind, id, ..] = rest {
                locator.resource = Some(ResourceRef {
                    kind: kind.parse()?,
                    id: (*id).to_string(),
                });
            }
        }
        ["o", org, rest @ ..] => {
            locator.organization_id = non_empty(Some(*org));
            if rest.first() == Some(&"workspace") {
                let query = |key: &str| {
                    url.query_pairs()
                        .find(|(k, _)| k == key)
                        .and_then(|(_, v)| non_empty(Some(&*v)))
                };
                locator.workspace_id = query("ws");
                if let (Some(kind), Some(id)) = (query("s"), query("i")) {
                    locator.resource = Some(ResourceRef {
                        kind: kind.parse()?,
                        id,
                    });
                }
            }
        }
        _ => {}
    }

    Ok(locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const ORG: &str = "3a874c05-26d1-4b8c-894d-caf90e40078b";
    const WS: &str = "f0e2095f-fe2b-479e-be4b-bbc77207f42d";

    #[test]
    fn test_web_workspace_url() {
        let url = format!("https://app.deepint.net/o/{ORG}/workspace?ws={WS}");
        let locator = parse_url(&url).unwrap();
        assert_eq!(locator.organization_id.as_deref(), Some(ORG));
        assert_eq!(locator.workspace_id.as_deref(), Some(WS));
        assert!(locator.resource.is_none());
    }

    #[test]
    fn test_api_workspace_url_has_no_organization() {
        let url = format!("https://app.deepint.net/api/v1/workspace/{WS}");
        let locator = parse_url(&url).unwrap();
        assert_eq!(locator.organization_id, None);
        assert_eq!(locator.workspace_id.as_deref(), Some(WS));
        assert_eq!(locator.organization_or(Some("org-2")).unwrap(), "org-2");
        assert!(locator.organization_or(None).is_err());
    }

    #[test_case("source", ResourceKind::Source ; "source")]
    #[test_case("alert", ResourceKind::Alert ; "alert")]
    #[test_case("task", ResourceKind::Task ; "task")]
    #[test_case("model", ResourceKind::Model ; "model")]
    #[test_case("visualization", ResourceKind::Visualization ; "visualization")]
    #[test_case("dashboard", ResourceKind::Dashboard ; "dashboard")]
    fn test_web_resource_url(segment: &str, kind: ResourceKind) {
        let url = format!("https://app.deepint.net/o/{ORG}/workspace?ws={WS}&s={segment}&i=obj-1");
        let locator = parse_url(&url).unwrap();
        assert_eq!(locator.require_resource(kind).unwrap(), "obj-1");
    }

    #[test_case("source", ResourceKind::Source ; "source")]
    #[test_case("alerts", ResourceKind::Alert ; "alerts")]
    #[test_case("task", ResourceKind::Task ; "task")]
    #[test_case("models", ResourceKind::Model ; "models")]
    #[test_case("visualization", ResourceKind::Visualization ; "visualization")]
    #[test_case("dashboard", ResourceKind::Dashboard ; "dashboard")]
    fn test_api_resource_url(segment: &str, kind: ResourceKind) {
        let url = format!("https://app.deepint.net/api/v1/workspace/{WS}/{segment}/obj-1");
        let locator = parse_url(&url).unwrap();
        assert_eq!(locator.require_workspace().unwrap(), WS);
        assert_eq!(locator.require_resource(kind).unwrap(), "obj-1");
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let url = format!("https://app.deepint.net/api/v1/workspace/{WS}/task/t-1");
        let locator = parse_url(&url).unwrap();
        let err = locator.require_resource(ResourceKind::Source).unwrap_err();
        assert!(matches!(err, Error::Validation { ref code, .. } if code == "URL_MISSING_FIELD"));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let url = format!("https://app.deepint.net/api/v1/workspace/{WS}/notebook/n-1");
        let err = parse_url(&url).unwrap_err();
        assert!(matches!(err, Error::Validation { ref code, .. } if code == "URL_UNKNOWN_RESOURCE"));
    }

    #[test]
    fn test_unrelated_url_yields_nothing() {
        let locator = parse_url("https://app.deepint.net/help").unwrap();
        assert_eq!(locator, ResourceLocator::default());
        assert!(locator.require_workspace().is_err());
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(parse_url("not a url"), Err(Error::InvalidUrl(_))));
    }
}
