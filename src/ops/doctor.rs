//! Environment health checks.
//!
//! `rigup doctor` probes every external collaborator the bootstrap relies
//! on and reports what is already in place. Nothing is mutated; each
//! check re-derives presence from the live system.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::util::config::Config;
use crate::util::context::GlobalContext;
use crate::util::process::{find_executable, is_present};

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: HashMap<String, String>,
}

impl DoctorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Options for the doctor command.
#[derive(Debug, Clone, Default)]
pub struct DoctorOptions {
    /// Include verbose output
    pub verbose: bool,
}

/// Run the doctor checks.
pub fn doctor(
    ctx: &GlobalContext,
    config: &Config,
    _options: &DoctorOptions,
) -> Result<DoctorReport> {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());
    report.environment.insert(
        "startup_file".to_string(),
        ctx.startup_file().display().to_string(),
    );

    report.add(check_scm());
    report.add(check_startup_file(ctx));
    report.add(check_probe(
        "Environment Manager",
        &config.env_manager.probe,
        format!("{} not installed; `rigup bootstrap` will clone it", config.env_manager.name),
    ));
    report.add(check_probe(
        "Version Manager",
        &config.toolchain.manager_probe,
        format!(
            "{} not installed; `rigup bootstrap` will fetch its installer",
            config.toolchain.manager
        ),
    ));
    report.add(check_toolchain(config));
    report.add(check_config_file(ctx));

    report.total_duration = start.elapsed();
    Ok(report)
}

/// Check for the SCM client. Required: the bootstrap clones over it.
fn check_scm() -> CheckResult {
    let start = Instant::now();

    if is_present("git", ["--version"]) {
        let mut check = CheckResult::pass("Git", "Git is available");
        if let Some(path) = find_executable("git") {
            check = check.with_path(path);
        }
        return check.with_duration(start.elapsed());
    }

    CheckResult::fail("Git", "Git not found (required for cloning the environment manager)")
        .with_duration(start.elapsed())
}

/// Check that the platform-selected startup file exists.
fn check_startup_file(ctx: &GlobalContext) -> CheckResult {
    let start = Instant::now();
    let path = ctx.startup_file();

    if path.exists() {
        CheckResult::pass("Startup File", format!("{} exists", path.display()))
            .with_path(path)
            .with_duration(start.elapsed())
    } else {
        CheckResult::fail(
            "Startup File",
            format!("{} does not exist; create it before bootstrapping", path.display()),
        )
        .with_duration(start.elapsed())
    }
}

/// Probe-based presence check for a configured tool.
fn check_probe(name: &str, probe: &[String], missing: String) -> CheckResult {
    let start = Instant::now();

    let present = match probe.split_first() {
        Some((program, args)) => is_present(program, args),
        None => false,
    };

    if present {
        let mut check = CheckResult::pass(name, format!("`{}` answers", probe.join(" ")));
        if let Some(path) = probe.first().and_then(|p| find_executable(p)) {
            check = check.with_path(path);
        }
        check.with_duration(start.elapsed()).optional()
    } else {
        CheckResult::fail(name, missing)
            .with_duration(start.elapsed())
            .optional()
    }
}

/// Check the toolchain binary behind the fetch command.
fn check_toolchain(config: &Config) -> CheckResult {
    let start = Instant::now();

    let Some(program) = config.toolchain.fetch.first() else {
        return CheckResult::fail("Toolchain", "no fetch command configured")
            .with_duration(start.elapsed())
            .optional();
    };

    if is_present(program, ["version"]) {
        let mut check = CheckResult::pass("Toolchain", format!("`{} version` answers", program));
        if let Some(path) = find_executable(program) {
            check = check.with_path(path);
        }
        check.with_duration(start.elapsed()).optional()
    } else {
        CheckResult::fail(
            "Toolchain",
            format!(
                "`{}` not usable; `rigup bootstrap` will install {}",
                program, config.toolchain.default_version
            ),
        )
        .with_duration(start.elapsed())
        .optional()
    }
}

/// Report whether a config file is in use.
fn check_config_file(ctx: &GlobalContext) -> CheckResult {
    let start = Instant::now();
    let path = ctx.config_path();

    if path.exists() {
        CheckResult::pass("Config", format!("using {}", path.display()))
            .with_path(path)
            .with_duration(start.elapsed())
            .optional()
    } else {
        CheckResult::pass("Config", "no config file; using built-in defaults")
            .with_duration(start.elapsed())
            .optional()
    }
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "Rigup Doctor").unwrap();
    writeln!(output, "============\n").unwrap();

    if verbose {
        writeln!(output, "Environment:").unwrap();
        writeln!(
            output,
            "  OS: {} ({})",
            report
                .environment
                .get("os")
                .unwrap_or(&"unknown".to_string()),
            report
                .environment
                .get("arch")
                .unwrap_or(&"unknown".to_string())
        )
        .unwrap();
        if let Some(startup) = report.environment.get("startup_file") {
            writeln!(output, "  Startup file: {}", startup).unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(output, "Checks:").unwrap();
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        writeln!(output, "  {} {}{}", status, check.name, required).unwrap();

        if verbose {
            writeln!(output, "      {}", check.message).unwrap();
            if let Some(path) = &check.path {
                writeln!(output, "      Path: {}", path.display()).unwrap();
            }
        }
    }

    writeln!(output).unwrap();

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    writeln!(output, "Summary: {} passed, {} failed", passed, failed).unwrap();

    if required_failed > 0 {
        writeln!(
            output,
            "\n{} required check(s) failed; fix them before running `rigup bootstrap`.",
            required_failed
        )
        .unwrap();
    } else if failed > 0 {
        writeln!(
            output,
            "\nAll required checks passed. {} missing piece(s) will be installed by `rigup bootstrap`.",
            failed
        )
        .unwrap();
    } else {
        writeln!(output, "\nAll checks passed. The workstation is fully bootstrapped.").unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    use crate::core::platform::ProfileKind;

    #[test]
    fn test_check_result_pass() {
        let result = CheckResult::pass("test", "passed");
        assert!(result.passed);
        assert!(result.required);
    }

    #[test]
    fn test_check_result_optional() {
        let result = CheckResult::fail("test", "missing").optional();
        assert!(!result.passed);
        assert!(!result.required);
    }

    #[test]
    fn test_report_counts() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("required", "ok"));
        report.add(CheckResult::fail("optional", "missing").optional());

        assert!(report.all_required_passed());
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.required_failed_count(), 0);
    }

    #[test]
    fn test_report_required_failed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::fail("required", "missing"));

        assert!(!report.all_required_passed());
        assert_eq!(report.required_failed_count(), 1);
    }

    #[test]
    fn test_doctor_flags_missing_startup_file() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_home(tmp.path(), ProfileKind::Default);
        let config = Config::default();

        let report = doctor(&ctx, &config, &DoctorOptions::default()).unwrap();
        let startup = report
            .checks
            .iter()
            .find(|c| c.name == "Startup File")
            .unwrap();
        assert!(!startup.passed);
        assert!(startup.required);
    }

    #[test]
    fn test_doctor_accepts_existing_startup_file() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_home(tmp.path(), ProfileKind::Default);
        fs::write(ctx.startup_file(), "").unwrap();
        let config = Config::default();

        let report = doctor(&ctx, &config, &DoctorOptions::default()).unwrap();
        let startup = report
            .checks
            .iter()
            .find(|c| c.name == "Startup File")
            .unwrap();
        assert!(startup.passed);
    }

    #[test]
    fn test_format_report_lists_checks() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("Git", "Git is available"));
        report.add(CheckResult::fail("Version Manager", "gvm not installed").optional());

        let output = format_report(&report, false);
        assert!(output.contains("[OK] Git"));
        assert!(output.contains("[!!] Version Manager (optional)"));
        assert!(output.contains("Summary: 1 passed, 1 failed"));
    }
}
