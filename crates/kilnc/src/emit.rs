use serde::Serialize;

use kiln_contracts::KILNC_REPORT_SCHEMA_VERSION;

use crate::descriptor::{MethodDescriptor, ReturnKind};
use crate::diagnostics::{Diagnostic, Stage};
use crate::fingerprint;
use crate::native::{BindRejection, MarkerTable};

/// Diagnostic code for a declared name that violates the marker naming
/// convention.
pub const DIAG_NAMING_CONVENTION: &str = "KILN-NATIVE-NAME-0001";

/// What the guarded form does with a host-level failure of a
/// value-returning native call.
///
/// `SwallowToAbsence` reproduces the reference behavior: the failure is
/// discarded and the caller observes the `null` absence sentinel, nothing
/// else. `PropagateAsResult` leaves the call unguarded so the failure
/// reaches the caller. The default stays lossy for compatibility; the enum
/// exists so that loss is a named choice, not an accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    #[default]
    SwallowToAbsence,
    PropagateAsResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitErrorKind {
    NamingConvention,
}

#[derive(Debug, Clone)]
pub struct EmitError {
    pub kind: EmitErrorKind,
    pub message: String,
}

impl EmitError {
    pub fn new(kind: EmitErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EmitError {}

#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub policy: FailurePolicy,
    pub markers: MarkerTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodOutcome {
    pub name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmitReport {
    pub schema_version: String,
    /// True iff every method emitted. Skips are advisory (the batch always
    /// runs to completion) but they still show up here and in `diagnostics`.
    pub ok: bool,
    pub emitted_count: usize,
    pub skipped_count: usize,
    pub methods: Vec<MethodOutcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    pub source_sha256: String,
}

#[derive(Debug, Clone)]
pub struct EmitOutput {
    pub source: String,
    pub report: EmitReport,
}

/// Translates declared native methods into host-call source text.
///
/// The emitter is deterministic: the same descriptor and options always
/// produce the same text, and a rejected descriptor produces exactly one
/// diagnostic and no text.
pub struct Emitter<'a> {
    options: &'a EmitOptions,
    out: String,
    indent: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a EmitOptions) -> Self {
        Self {
            options,
            out: String::new(),
            indent: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn line(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    /// Positional argument list for the emitted call. The descriptor's own
    /// numbering is 1-based; emitted references are 0-based.
    fn arg_list(parameter_count: u32) -> String {
        let mut args = String::new();
        for i in 0..parameter_count {
            if i > 0 {
                args.push_str(", ");
            }
            args.push_str(&format!("arg{i}"));
        }
        args
    }

    /// Emit the body of one native method: a guarded or unguarded call
    /// against the bound host function.
    ///
    /// On a convention violation nothing is emitted, one diagnostic is
    /// recorded, and the error names the offending method; the caller
    /// decides whether to skip or abort.
    pub fn emit_method(&mut self, d: &MethodDescriptor) -> Result<String, EmitError> {
        let binding = match self.options.markers.resolve(&d.name) {
            Ok(binding) => binding,
            Err(rejection) => {
                let message = rejection.describe(&d.name);
                let mut diag = Diagnostic::error(DIAG_NAMING_CONVENTION, Stage::Bind, &message)
                    .for_method(&d.name);
                if rejection == BindRejection::UnknownMarker {
                    let markers: Vec<&str> =
                        self.options.markers.entries().map(|(m, _)| m).collect();
                    diag = diag.with_note(format!("registered markers: {}", markers.join(", ")));
                }
                self.diagnostics.push(diag);
                return Err(EmitError::new(EmitErrorKind::NamingConvention, message));
            }
        };

        let call = format!("{}({})", binding.call_target(), Self::arg_list(d.parameter_count));
        let start = self.out.len();
        match d.return_kind {
            ReturnKind::Void => {
                // Fire-and-forget: host-level failure is not observed at all.
                self.line(&format!("{call};"));
            }
            ReturnKind::Value => match self.options.policy {
                FailurePolicy::SwallowToAbsence => {
                    self.line("try {");
                    self.indent += 1;
                    self.line(&format!("return {call};"));
                    self.indent -= 1;
                    self.line("} catch ($e) {");
                    self.indent += 1;
                    // Host failure detail is discarded here; callers observe
                    // null only.
                    self.line("return null;");
                    self.indent -= 1;
                    self.line("}");
                }
                FailurePolicy::PropagateAsResult => {
                    self.line(&format!("return {call};"));
                }
            },
        }
        Ok(self.out[start..].to_string())
    }

    fn emit_function(&mut self, d: &MethodDescriptor) -> Result<(), EmitError> {
        let header = format!(
            "function {}({}) {{",
            d.name,
            Self::arg_list(d.parameter_count)
        );
        let snapshot = self.out.len();
        self.line(&header);
        self.indent += 1;
        let body = self.emit_method(d);
        self.indent -= 1;
        match body {
            Ok(_) => {
                self.line("}");
                Ok(())
            }
            Err(err) => {
                // Roll the header back so a skipped method leaves no text.
                self.out.truncate(snapshot);
                Err(err)
            }
        }
    }
}

/// Emit every descriptor in the batch. A malformed name skips that one
/// method with a single diagnostic; it never aborts the rest.
pub fn emit_program(methods: &[MethodDescriptor], options: &EmitOptions) -> EmitOutput {
    let mut emitter = Emitter::new(options);
    let mut outcomes = Vec::with_capacity(methods.len());
    let mut emitted = 0usize;
    let mut skipped = 0usize;

    for d in methods {
        match emitter.emit_function(d) {
            Ok(()) => {
                emitted += 1;
                let call_target = options
                    .markers
                    .resolve(&d.name)
                    .map(|b| b.call_target())
                    .ok();
                outcomes.push(MethodOutcome {
                    name: d.name.clone(),
                    ok: true,
                    call_target,
                });
            }
            Err(_) => {
                skipped += 1;
                outcomes.push(MethodOutcome {
                    name: d.name.clone(),
                    ok: false,
                    call_target: None,
                });
            }
        }
    }

    let diagnostics = emitter.take_diagnostics();
    let source = emitter.out;
    let report = EmitReport {
        schema_version: KILNC_REPORT_SCHEMA_VERSION.to_string(),
        ok: skipped == 0,
        emitted_count: emitted,
        skipped_count: skipped,
        methods: outcomes,
        diagnostics,
        source_sha256: fingerprint::source_fingerprint(&source),
    };
    EmitOutput { source, report }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_one(d: &MethodDescriptor) -> (Result<String, EmitError>, Vec<Diagnostic>) {
        let options = EmitOptions::default();
        let mut emitter = Emitter::new(&options);
        let out = emitter.emit_method(d);
        (out, emitter.take_diagnostics())
    }

    #[test]
    fn value_native_emits_guarded_call() {
        let d = MethodDescriptor::new("FS_open", 2, ReturnKind::Value);
        let (out, diags) = emit_one(&d);
        let text = out.expect("emitted");
        assert!(text.contains("return FS.open(arg0, arg1);"), "{text}");
        assert!(text.contains("try {"));
        assert!(text.contains("return null;"));
        assert!(diags.is_empty());
    }

    #[test]
    fn void_native_emits_unguarded_statement() {
        let d = MethodDescriptor::new("FS_close", 1, ReturnKind::Void);
        let (out, diags) = emit_one(&d);
        let text = out.expect("emitted");
        assert_eq!(text, "FS.close(arg0);\n");
        assert!(!text.contains("try"));
        assert!(!text.contains("catch"));
        assert!(diags.is_empty());
    }

    #[test]
    fn zero_parameters_emit_empty_argument_list() {
        let d = MethodDescriptor::new("FS_flush", 0, ReturnKind::Void);
        let (out, _) = emit_one(&d);
        assert_eq!(out.expect("emitted"), "FS.flush();\n");
    }

    #[test]
    fn malformed_name_emits_nothing_and_one_diagnostic() {
        let d = MethodDescriptor::new("Invalid", 0, ReturnKind::Void);
        let (out, diags) = emit_one(&d);
        let err = out.expect_err("rejected");
        assert_eq!(err.kind, EmitErrorKind::NamingConvention);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DIAG_NAMING_CONVENTION);
        assert_eq!(diags[0].method.as_deref(), Some("Invalid"));
    }

    #[test]
    fn propagate_policy_drops_the_guard() {
        let options = EmitOptions {
            policy: FailurePolicy::PropagateAsResult,
            ..EmitOptions::default()
        };
        let mut emitter = Emitter::new(&options);
        let d = MethodDescriptor::new("FS_open", 2, ReturnKind::Value);
        let text = emitter.emit_method(&d).expect("emitted");
        assert_eq!(text, "return FS.open(arg0, arg1);\n");
        assert!(!text.contains("catch"));
    }

    #[test]
    fn large_parameter_count_emits_every_argument() {
        // Any conforming descriptor emits, whatever its declared arity.
        let d = MethodDescriptor::new("FS_open", 300, ReturnKind::Value);
        let (out, diags) = emit_one(&d);
        let text = out.expect("emitted");
        assert!(text.contains("FS.open(arg0,"), "{text}");
        assert!(text.contains("arg299)"), "{text}");
        assert!(!text.contains("arg300"));
        assert!(diags.is_empty());

        let batch = emit_program(&[d], &EmitOptions::default());
        assert!(batch.report.ok);
        assert_eq!(batch.report.emitted_count, 1);
        assert!(batch.report.diagnostics.is_empty());
    }

    #[test]
    fn unknown_marker_diagnostic_lists_registered_markers() {
        let d = MethodDescriptor::new("GL_clear", 0, ReturnKind::Void);
        let (out, diags) = emit_one(&d);
        assert!(out.is_err());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].notes.len(), 1);
        assert!(diags[0].notes[0].contains("FS"), "{:?}", diags[0].notes);
    }

    #[test]
    fn emit_is_deterministic() {
        let d = MethodDescriptor::new("FS_open", 2, ReturnKind::Value);
        let (a, _) = emit_one(&d);
        let (b, _) = emit_one(&d);
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn batch_skips_malformed_and_keeps_the_rest() {
        let methods = vec![
            MethodDescriptor::new("FS_open", 2, ReturnKind::Value),
            MethodDescriptor::new("Invalid", 0, ReturnKind::Void),
            MethodDescriptor::new("FS_close", 1, ReturnKind::Void),
        ];
        let out = emit_program(&methods, &EmitOptions::default());
        assert!(!out.report.ok);
        assert_eq!(out.report.emitted_count, 2);
        assert_eq!(out.report.skipped_count, 1);
        assert_eq!(out.report.diagnostics.len(), 1);
        assert!(out.source.contains("function FS_open(arg0, arg1) {"));
        assert!(out.source.contains("function FS_close(arg0) {"));
        assert!(!out.source.contains("Invalid"));
    }
}
