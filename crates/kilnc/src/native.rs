use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Separator between the native marker and the host function name in a
/// declared method name, e.g. `FS_open`.
pub const MARKER_SEPARATOR: char = '_';

/// Reserved marker for the host file-system stand-in namespace.
pub const MARKER_FS: &str = "FS";

/// Host namespace object the `FS` marker maps to.
pub const NAMESPACE_FS: &str = "FS";

/// Why a declared name failed to resolve to a native binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindRejection {
    /// Name contains no marker separator at all.
    NoSeparator,
    /// The portion before the separator is empty or not a registered marker.
    UnknownMarker,
    /// Nothing follows the separator, so there is no function name.
    EmptySuffix,
}

impl BindRejection {
    pub fn describe(self, name: &str) -> String {
        match self {
            BindRejection::NoSeparator => format!(
                "native method name {name:?} does not match the marker naming convention \
                 (expected <Marker>{MARKER_SEPARATOR}<Suffix>)"
            ),
            BindRejection::UnknownMarker => format!(
                "native method name {name:?} does not start with a registered native marker"
            ),
            BindRejection::EmptySuffix => {
                format!("native method name {name:?} has no function name after the marker")
            }
        }
    }
}

/// Resolved target of a native method: a function inside a host namespace
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeBinding {
    pub host_namespace: String,
    pub host_function: String,
}

impl NativeBinding {
    /// Call target as it appears in emitted source, `<namespace>.<suffix>`.
    pub fn call_target(&self) -> String {
        format!("{}.{}", self.host_namespace, self.host_function)
    }
}

/// The fixed marker -> host-namespace mapping for one emitter run.
///
/// The table is populated at construction and read-only afterwards; a
/// deterministic map keeps listings and reports stable.
#[derive(Debug, Clone)]
pub struct MarkerTable {
    markers: BTreeMap<String, String>,
}

impl Default for MarkerTable {
    fn default() -> Self {
        let mut markers = BTreeMap::new();
        markers.insert(MARKER_FS.to_string(), NAMESPACE_FS.to_string());
        Self { markers }
    }
}

impl MarkerTable {
    /// Table with an extra marker registered, for hosts exposing more
    /// namespace objects than the reserved set.
    pub fn with_marker(mut self, marker: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.markers.insert(marker.into(), namespace.into());
        self
    }

    pub fn namespace_for(&self, marker: &str) -> Option<&str> {
        self.markers.get(marker).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.markers.iter().map(|(m, n)| (m.as_str(), n.as_str()))
    }

    /// Split `name` on its first separator and map the marker prefix to a
    /// host namespace. No binding exists unless the separator is present,
    /// the prefix is a registered marker, and the suffix is non-empty.
    pub fn resolve(&self, name: &str) -> Result<NativeBinding, BindRejection> {
        let (marker, suffix) = name
            .split_once(MARKER_SEPARATOR)
            .ok_or(BindRejection::NoSeparator)?;
        if marker.is_empty() {
            return Err(BindRejection::UnknownMarker);
        }
        let namespace = self
            .namespace_for(marker)
            .ok_or(BindRejection::UnknownMarker)?;
        if suffix.is_empty() {
            return Err(BindRejection::EmptySuffix);
        }
        Ok(NativeBinding {
            host_namespace: namespace.to_string(),
            host_function: suffix.to_string(),
        })
    }
}
