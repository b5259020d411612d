// src/builder.rs
//
// Derives platform, build type and job type from a buildbot builder name,
// e.g. "Linux x86-64 mozilla-central leak test build" or
// "Rev3 WINNT 6.1 mozilla-central opt test mochitests-1/5".

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Opt,
    Debug,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Build,
    Unittest,
    Talos,
}

// More specific platforms come first; the regex crate has no lookahead.
const PLATFORMS: &[(&str, &[&str])] = &[
    ("linux64", &["^linux x86-64 ", "linux64"]),
    ("fedora64", &["^rev3 fedora 12x64 ", "fedora64"]),
    ("fedora", &["^rev3 fedora 12 ", "fedora"]),
    ("linux", &["^linux ", "linux"]),
    ("macosx64", &[r"^os x 10\.6", r"^rev3 macosx 10\.6", "macosx64", "snowleopard"]),
    ("macosx", &[r"^os x 10\.5", r"^rev3 macosx 10\.5", "macosx", "leopard"]),
    ("win64", &[r"^winnt 6\.1 x64", r"^rev3 winnt 6\.1 x64", "win64"]),
    ("win32", &["^winnt ", "^rev3 winnt ", "win32"]),
    ("android", &["android"]),
    ("maemo", &["maemo"]),
];

const DEBUG: &str = r"\bdebug\b";

const JOBS: &[(JobType, &str)] = &[
    (JobType::Talos, r"\btalos\b"),
    (JobType::Build, r"\b(build|nightly|l10n|repack)\b"),
    (JobType::Unittest, r"\b(test|unittest|mochitests?|reftest|crashtest|jsreftest|xpcshell)\b"),
];

struct Tables {
    platforms: Vec<(&'static str, Vec<Regex>)>,
    debug: Regex,
    jobs: Vec<(JobType, Regex)>,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("builder pattern compiles")
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| Tables {
        platforms: PLATFORMS
            .iter()
            .map(|(name, pats)| (*name, pats.iter().map(|p| compile(p)).collect()))
            .collect(),
        debug: compile(DEBUG),
        jobs: JOBS.iter().map(|(job, p)| (*job, compile(p))).collect(),
    })
}

pub fn platform(buildername: Option<&str>) -> Option<&'static str> {
    let name = buildername?;
    tables()
        .platforms
        .iter()
        .find(|(_, pats)| pats.iter().any(|p| p.is_match(name)))
        .map(|(platform, _)| *platform)
}

pub fn build_type(buildername: Option<&str>) -> Option<BuildType> {
    let name = buildername?;
    if tables().debug.is_match(name) {
        Some(BuildType::Debug)
    } else {
        Some(BuildType::Opt)
    }
}

pub fn job_type(buildername: Option<&str>) -> Option<JobType> {
    let name = buildername?;
    tables()
        .jobs
        .iter()
        .find(|(_, p)| p.is_match(name))
        .map(|(job, _)| *job)
}
