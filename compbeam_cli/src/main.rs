//! # compbeam CLI
//!
//! Runs a composite beam design check from a JSON input document, or from
//! a prompted reference beam when no document is given.
//!
//! ```text
//! compbeam_cli [input.json] [--report out.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see per-context factoring and solver steps.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{error, info};

use compbeam_core::calculations::{CompositeBeamInput, CompositeSteelBeam, DesignReport, DesignSummary};
use compbeam_core::errors::{CalcError, CalcResult};
use compbeam_core::file_io::{load_input, save_report};
use compbeam_core::loads::{LoadType, UniformLoad};
use compbeam_core::materials::builtin_w_shapes;

struct Args {
    input: Option<PathBuf>,
    report: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        input: None,
        report: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--report" => {
                let path = iter.next().ok_or("--report needs a file path")?;
                args.report = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err("usage: compbeam_cli [input.json] [--report out.json]".to_string()),
            other if args.input.is_none() => args.input = Some(PathBuf::from(other)),
            other => return Err(format!("unexpected argument '{}'", other)),
        }
    }
    Ok(args)
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

/// W16X26 reference beam with prompted span and loads
fn prompted_input() -> CompositeBeamInput {
    println!("No input file given. Checking a W16X26 composite beam...");
    println!();

    let span_ft = prompt_f64("Span (ft) [30.0]: ", 30.0);
    let loads = [
        ("Uniform Dead Load", LoadType::Dead, "Dead (klf) [0.5]: ", 0.5),
        ("Uniform Construction Dead Load", LoadType::ConstructionDead, "Construction dead (klf) [0.5]: ", 0.5),
        ("Uniform Live Load", LoadType::Live, "Live (klf) [1.3]: ", 1.3),
        ("Uniform Construction Live Load", LoadType::ConstructionLive, "Construction live (klf) [0.2]: ", 0.2),
        ("Uniform Partition Live Load", LoadType::PartitionLive, "Partition live (klf) [0.0]: ", 0.0),
    ]
    .into_iter()
    .map(|(name, load_type, prompt, default)| {
        UniformLoad::full_span(name, load_type, prompt_f64(prompt, default), span_ft)
    })
    .collect();

    CompositeBeamInput {
        span_ft,
        loads,
        ..CompositeBeamInput::reference()
    }
}

fn run(args: &Args) -> CalcResult<DesignReport> {
    let input = match &args.input {
        Some(path) => load_input(path)?,
        None => prompted_input(),
    };

    let mut beam = CompositeSteelBeam::new(input, &builtin_w_shapes())?;
    beam.analyze()?;
    let report = DesignReport::new(&beam)?;

    if let Some(path) = &args.report {
        save_report(&report, path)?;
        info!("Report saved to {}", path.display());
    }
    Ok(report)
}

fn print_summary(s: &DesignSummary) {
    println!();
    println!("═══════════════════════════════════════");
    println!("  COMPOSITE BEAM: {}", s.beam);
    println!("═══════════════════════════════════════");
    println!();
    println!("Section:");
    println!("  Shape:   {} over {:.1} ft{}", s.shape, s.span_ft, if s.shored { " (shored)" } else { "" });
    println!("  Web:     {}", if s.web_compact { "compact" } else { "not compact" });
    println!("  Flange:  {}", if s.flange_compact { "compact" } else { "not compact" });
    println!();
    println!("Composite section:");
    println!("  b_eff = {:.2} ft,  n = {:.2}", s.effective_width_ft, s.modular_ratio);
    println!("  y_PNA = {:.2} in,  C = {:.1} k,  a = {:.2} in",
        s.plastic_neutral_axis_in,
        s.compressive_force_kips,
        s.stress_block_depth_in
    );
    println!();
    println!("Strength:");
    match &s.pre_composite {
        Some(pre) => println!("  Pre-composite: {:.2} ({:.1}/{:.1} kip-ft, {}) {}",
            pre.unity,
            pre.demand_kip_ft,
            pre.capacity_kip_ft,
            pre.governing_combination,
            status_icon(pre.passes())
        ),
        None => println!("  Pre-composite: shored, not checked"),
    }
    println!("  Composite:     {:.2} ({:.1}/{:.1} kip-ft, {}) {}",
        s.composite.unity,
        s.composite.demand_kip_ft,
        s.composite.capacity_kip_ft,
        s.composite.governing_combination,
        status_icon(s.composite.passes())
    );
    println!("  Vu = {:.1} k", s.max_shear_kips);
    println!();
    println!("Service:");
    println!("  Ilb = {:.0} in⁴", s.lower_bound_inertia_in4);
    match s.live_deflection_ratio {
        Some(ratio) => println!("  δ_L = {:.2}\" (L/{:.0}) {}",
            s.live_deflection_in,
            ratio,
            status_icon(s.live_deflection_passes())
        ),
        None => println!("  δ_L = 0"),
    }
    if let Some(ratio) = s.service_deflection_ratio {
        println!("  δ_total on steel = {:.2}\" (L/{:.0})", s.service_deflection_in, ratio);
    }
    println!();
    println!("Studs (Qn = {:.2} k):", s.studs.qn_kips);
    println!("  {:.0}% composite: {}", s.studs.min_ratio * 100.0, s.studs.min_count);
    println!("  {:.0}% composite: {}", s.studs.max_ratio * 100.0, s.studs.max_count);
    println!();
    println!("═══════════════════════════════════════");
    println!("  RESULT: {} (max unity {:.2})", if s.passes() { "PASS" } else { "FAIL" }, s.governing_unity());
    println!("═══════════════════════════════════════");
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(report) => {
            print_summary(&report.summary);
            println!();
            println!("JSON Output:");
            if let Ok(json) = serde_json::to_string_pretty(&report.summary) {
                println!("{}", json);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{} [{}]", e, e.error_code());
            print_error_json(&e, args.input.as_deref());
            ExitCode::FAILURE
        }
    }
}

fn print_error_json(e: &CalcError, input: Option<&Path>) {
    if let Some(path) = input {
        eprintln!("Input: {}", path.display());
    }
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
