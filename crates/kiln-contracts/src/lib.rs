//! Shared, version-pinned protocol identifiers.
//!
//! These constants are the single source of truth for schema/version strings
//! that appear in machine-readable I/O. Bump the trailing version when the
//! corresponding wire shape changes.

pub const KILN_DESCRIPTORS_SCHEMA_VERSION: &str = "kiln.descriptors@0.1.0";
pub const KILNC_REPORT_SCHEMA_VERSION: &str = "kilnc.report@0.1.0";
pub const NATIVE_BINDINGS_SCHEMA_VERSION: &str = "kiln.native-bindings@0.1.0";
