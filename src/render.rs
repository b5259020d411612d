// src/render.rs

use crate::pushes::PushesReport;
use crate::report::EndToEndTimesReport;
use crate::run::BuildRun;
use crate::window::format_ts;
use std::fmt::Write;

fn minutes(secs: f64) -> String {
    format!("{:.1} min", secs / 60.0)
}

pub fn end_to_end_text(report: &EndToEndTimesReport, summary: bool) -> String {
    let w = report.window();
    let mut out = String::new();
    let _ = writeln!(out, "End-to-end times for {}", report.branch_name());
    let _ = writeln!(out, "  from {} to {}", format_ts(w.start), format_ts(w.end));
    let _ = writeln!(
        out,
        "  {} runs, {} build requests ({} unique), average {}",
        report.get_total_build_runs(),
        report.get_total_build_requests(),
        report.get_unique_total_build_requests(),
        minutes(report.get_avg_duration()),
    );
    if !summary {
        for run in report.runs() {
            out.push_str(&run_line(run));
        }
    }
    out
}

fn run_line(run: &BuildRun) -> String {
    let c = run.status_counts();
    format!(
        "  {:<12} {:<9} {:>10}  {}p {}r {}c {}x {}i {}m\n",
        run.revision().unwrap_or("-"),
        run.results().as_str(),
        minutes(run.get_duration() as f64),
        c.pending,
        c.running,
        c.complete,
        c.cancelled,
        c.interrupted,
        c.misc,
    )
}

pub fn build_run_text(run: &BuildRun, summary: bool) -> String {
    let c = run.status_counts();
    let r = run.result_counts();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Build run {} on {}",
        run.revision().unwrap_or("(nightly)"),
        run.branch_name().unwrap_or("all branches"),
    );
    let _ = writeln!(
        out,
        "  result {}, {}",
        run.results().as_str(),
        if run.is_complete() { "complete" } else { "in progress" },
    );
    let _ = writeln!(
        out,
        "  {} requests ({} unique): {} pending, {} running, {} complete, {} cancelled, {} interrupted, {} misc",
        run.get_total_build_requests(),
        run.get_unique_total_build_requests(),
        c.pending,
        c.running,
        c.complete,
        c.cancelled,
        c.interrupted,
        c.misc,
    );
    let _ = writeln!(
        out,
        "  results: {} success, {} warnings, {} failure, {} other; {} rebuilds, {} forced",
        r.success, r.warnings, r.failure, r.other, run.rebuilds(), run.forcebuilds(),
    );
    if run.lst_change_time() != 0 {
        let _ = writeln!(out, "  first change {}", format_ts(run.lst_change_time()));
    }
    let _ = writeln!(out, "  duration {}", minutes(run.get_duration() as f64));
    if !summary {
        for br in run.build_requests() {
            let _ = writeln!(
                out,
                "    {:>8} {:<11} {:<9} {}",
                br.brid().map_or_else(|| "-".to_string(), |id| id.to_string()),
                br.status().as_str(),
                br.results().as_str(),
                br.row().buildername.as_deref().unwrap_or(""),
            );
        }
    }
    out
}

pub fn pushes_text(report: &PushesReport) -> String {
    let w = report.window();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} pushes from {} to {}",
        report.get_total(None),
        format_ts(w.start),
        format_ts(w.end)
    );
    if report.int_size() > 0 {
        for (idx, count) in report.get_intervals(None).iter().enumerate() {
            let _ = writeln!(out, "  {}  {}", format_ts(report.get_interval_timestamp(idx)), count);
        }
    }
    for (name, b) in report.branches() {
        let _ = writeln!(out, "  {:<28} {}", name, b.total);
    }
    out
}
