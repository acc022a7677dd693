use serde::{Deserialize, Serialize};

/// Declared return shape of a native method. The emitter branches on this:
/// value-returning natives get the guarded form, void natives a bare call
/// statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    Void,
    Value,
}

/// One declared native method, as handed to the emitter by the front end.
/// Owned transiently by the emit call; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDescriptor {
    pub name: String,
    pub parameter_count: u32,
    pub return_kind: ReturnKind,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, parameter_count: u32, return_kind: ReturnKind) -> Self {
        Self {
            name: name.into(),
            parameter_count,
            return_kind,
        }
    }
}

/// Wire form of a descriptor batch, read from JSON by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorSet {
    pub schema_version: String,
    pub methods: Vec<MethodDescriptor>,
}

impl DescriptorSet {
    pub fn check_schema(&self) -> Result<(), String> {
        if self.schema_version != kiln_contracts::KILN_DESCRIPTORS_SCHEMA_VERSION {
            return Err(format!(
                "unsupported descriptor schema {:?} (expected {:?})",
                self.schema_version,
                kiln_contracts::KILN_DESCRIPTORS_SCHEMA_VERSION
            ));
        }
        Ok(())
    }
}
