use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use kiln_contracts::NATIVE_BINDINGS_SCHEMA_VERSION;
use kilnc::descriptor::DescriptorSet;
use kilnc::emit::{emit_program, EmitOptions, EmitReport, FailurePolicy};
use kilnc::native::MarkerTable;

#[derive(Parser)]
#[command(name = "kilnc")]
#[command(about = "Kiln native bridge emitter (method descriptors -> host source).", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List the registered native markers and their host namespaces.
    Markers {
        #[arg(long)]
        report_json: bool,
    },
    /// Emit host-call source for a descriptor set.
    Emit {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = FailurePolicy::SwallowToAbsence)]
        policy: FailurePolicy,
        #[arg(long)]
        report_json: bool,
    },
}

#[derive(Debug, Serialize)]
struct MarkersReport {
    schema_version: &'static str,
    markers: Vec<MarkerRow>,
}

#[derive(Debug, Serialize)]
struct MarkerRow {
    marker: String,
    host_namespace: String,
}

fn main() -> std::process::ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Markers { report_json } => {
            let table = MarkerTable::default();
            if report_json {
                let report = MarkersReport {
                    schema_version: NATIVE_BINDINGS_SCHEMA_VERSION,
                    markers: table
                        .entries()
                        .map(|(m, n)| MarkerRow {
                            marker: m.to_string(),
                            host_namespace: n.to_string(),
                        })
                        .collect(),
                };
                print_json(&report)?;
            } else {
                for (marker, namespace) in table.entries() {
                    println!("{marker} -> {namespace}");
                }
            }
            Ok(std::process::ExitCode::SUCCESS)
        }
        Cmd::Emit {
            input,
            out,
            policy,
            report_json,
        } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("read input {}", input.display()))?;
            let set: DescriptorSet = serde_json::from_slice(&bytes)
                .with_context(|| format!("parse descriptor set {}", input.display()))?;
            set.check_schema().map_err(anyhow::Error::msg)?;

            let options = EmitOptions {
                policy,
                markers: MarkerTable::default(),
            };
            let emitted = emit_program(&set.methods, &options);

            if let Some(out) = &out {
                std::fs::write(out, emitted.source.as_bytes())
                    .with_context(|| format!("write output {}", out.display()))?;
            }

            for d in &emitted.report.diagnostics {
                eprintln!("{}: {}", d.code, d.message);
            }

            if report_json {
                print_json(&emitted.report)?;
            } else {
                if out.is_none() {
                    print!("{}", emitted.source);
                }
                print_summary(&emitted.report);
            }
            Ok(std::process::ExitCode::SUCCESS)
        }
    }
}

fn print_summary(report: &EmitReport) {
    eprintln!(
        "emitted {} method(s), skipped {} (sha256 {})",
        report.emitted_count, report.skipped_count, report.source_sha256
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
