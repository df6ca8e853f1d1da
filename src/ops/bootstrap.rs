//! The bootstrap orchestration.
//!
//! Translates configuration plus platform context into the ordered step
//! sequence and hands it to the runner. Presence is always re-derived from
//! the live system at each precondition; a previous run's outcome is never
//! assumed, so a partially-completed bootstrap is safe to re-run from the
//! top.
//!
//! Sequence:
//! 1. install the environment manager (clone at a pinned branch, install
//!    into the user's local tool registry)
//! 2. wire the PATH and shell-integration lines into the startup file
//! 3. run the version-manager installer (unconditionally; the installer
//!    is expected to no-op when already installed)
//! 4. install the pinned toolchain versions and select the default
//! 5. fetch auxiliary tools under a scoped workspace variable
//! 6. wire the completion block, guarded by its sentinel comment

use std::path::Path;

use crate::core::errors::BootstrapError;
use crate::core::runner::{plan_steps, run_steps, RunReport, StepFailure};
use crate::core::step::{Step, StepState};
use crate::util::config::{Config, EnvManagerConfig, ToolConfig, ToolchainConfig};
use crate::util::context::GlobalContext;
use crate::util::download::fetch_script;
use crate::util::fs::ensure_dir;
use crate::util::process::{is_present, ProcessBuilder};
use crate::util::profile::ProfileEditor;
use crate::util::shell::{Shell, Status};

/// Options for the bootstrap command.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Resolve preconditions and print the plan without running actions.
    pub dry_run: bool,
}

/// Run (or plan) the full bootstrap sequence.
pub fn bootstrap(
    ctx: &GlobalContext,
    config: &Config,
    shell: &Shell,
    options: &BootstrapOptions,
) -> Result<Option<RunReport>, StepFailure> {
    let steps = build_steps(ctx, config);

    if options.dry_run {
        for (name, state) in plan_steps(&steps) {
            match state {
                StepState::Skipped => {
                    shell.status(Status::Skipped, format!("{} (already satisfied)", name));
                    shell.step_event(&name, "skipped", None);
                }
                _ => {
                    shell.status(Status::Info, format!("would run: {}", name));
                    shell.step_event(&name, "pending", None);
                }
            }
        }
        return Ok(None);
    }

    let report = run_steps(steps, shell)?;
    shell.status(
        Status::Finished,
        format!(
            "bootstrap: {} step(s) executed, {} skipped",
            report.executed(),
            report.skipped()
        ),
    );
    Ok(Some(report))
}

/// Build the concrete step sequence for this context and configuration.
pub fn build_steps(ctx: &GlobalContext, config: &Config) -> Vec<Step> {
    let mut steps = Vec::new();

    steps.push(env_manager_step(ctx, &config.env_manager));
    steps.push(profile_wiring_step(ctx, config));
    steps.push(version_manager_step(&config.toolchain));

    for version in &config.toolchain.versions {
        steps.push(toolchain_version_step(&config.toolchain, version));
    }
    steps.push(default_version_step(&config.toolchain));

    for tool in &config.tools {
        steps.push(aux_tool_step(ctx, &config.toolchain, tool));
    }

    steps.push(completion_wiring_step(ctx, config));

    steps
}

fn env_manager_step(ctx: &GlobalContext, cfg: &EnvManagerConfig) -> Step {
    let probe = cfg.probe.clone();
    let dest = ctx.resolve(&cfg.dest);
    let cfg = cfg.clone();

    Step::new(
        format!("install {}", cfg.name),
        format!(
            "could not install {}; check SSH access to {}",
            cfg.name, cfg.repo_url
        ),
        move || install_env_manager(&dest, &cfg, "git"),
    )
    .skip_if(move || !probe.is_empty() && is_present(&probe[0], &probe[1..]))
}

/// The environment-manager install sequence. Order matters: the conflict
/// check and the SCM check both run before anything touches the network.
fn install_env_manager(
    dest: &Path,
    cfg: &EnvManagerConfig,
    scm: &str,
) -> Result<(), BootstrapError> {
    if dest.exists() {
        return Err(BootstrapError::AlreadyInstalledConflict {
            tool: cfg.name.clone(),
            dir: dest.to_path_buf(),
            probe: cfg.probe.join(" "),
        });
    }

    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }

    if !ProcessBuilder::new(scm).arg("--version").probe() {
        return Err(BootstrapError::DependencyMissing(scm.to_string()));
    }

    tracing::info!("cloning {} (branch {})", cfg.repo_url, cfg.branch);
    ProcessBuilder::new(scm)
        .args(["clone", "-b", &cfg.branch, &cfg.repo_url])
        .arg(dest)
        .exec_checked()
        .map_err(|source| BootstrapError::CloneFailure {
            url: cfg.repo_url.clone(),
            dest: dest.to_path_buf(),
            source,
        })?;

    let (program, args) = cfg
        .install
        .split_first()
        .ok_or_else(|| BootstrapError::DependencyMissing("install command".to_string()))?;
    ProcessBuilder::new(program)
        .args(args)
        .cwd(dest)
        .exec_checked()
        .map_err(|source| BootstrapError::InstallFailure {
            what: cfg.name.clone(),
            source: Box::new(source),
        })?;

    Ok(())
}

fn profile_wiring_step(ctx: &GlobalContext, config: &Config) -> Step {
    let startup = ctx.startup_file();
    let path_line = config.profile.path_line.clone();
    let integration_line = config.profile.integration_line.clone();

    Step::new(
        "wire shell profile",
        format!("could not update {}", startup.display()),
        move || {
            let editor = ProfileEditor::new(&startup);
            editor.ensure_line(&path_line)?;
            editor.ensure_line(&integration_line)?;
            Ok(())
        },
    )
}

fn version_manager_step(cfg: &ToolchainConfig) -> Step {
    let manager = cfg.manager.clone();
    let url = cfg.installer_url.clone();

    // Deliberately no presence precondition: the installer is re-run on
    // every bootstrap and is expected to no-op when already installed.
    Step::new(
        format!("install {}", manager),
        format!("installer at {} did not complete", url),
        move || {
            let script =
                fetch_script(&url).map_err(|source| BootstrapError::InstallFailure {
                    what: manager.clone(),
                    source: Box::new(source),
                })?;
            ProcessBuilder::new("bash")
                .arg(script.path())
                .exec_checked()
                .map_err(|source| BootstrapError::InstallFailure {
                    what: manager.clone(),
                    source: Box::new(source),
                })?;
            Ok(())
        },
    )
}

fn toolchain_version_step(cfg: &ToolchainConfig, version: &str) -> Step {
    let manager = cfg.manager.clone();
    let version = version.to_string();
    let what = version.clone();

    Step::new(
        format!("install toolchain {}", version),
        format!("`{} install {}` failed", manager, version),
        move || {
            ProcessBuilder::new(&manager)
                .args(["install", version.as_str()])
                .exec_checked()
                .map_err(|source| BootstrapError::InstallFailure {
                    what,
                    source: Box::new(source),
                })?;
            Ok(())
        },
    )
}

fn default_version_step(cfg: &ToolchainConfig) -> Step {
    let manager = cfg.manager.clone();
    let version = cfg.default_version.clone();
    let what = format!("default toolchain {}", version);

    Step::new(
        format!("select default toolchain {}", version),
        format!("`{} use {} --default` failed", manager, version),
        move || {
            ProcessBuilder::new(&manager)
                .args(["use", version.as_str(), "--default"])
                .exec_checked()
                .map_err(|source| BootstrapError::InstallFailure {
                    what,
                    source: Box::new(source),
                })?;
            Ok(())
        },
    )
}

fn aux_tool_step(ctx: &GlobalContext, toolchain: &ToolchainConfig, tool: &ToolConfig) -> Step {
    let probe = tool.probe.clone();
    let fetch = toolchain.fetch.clone();
    let workspace_var = toolchain.workspace_var.clone();
    let workspace_dir = ctx.resolve(&toolchain.workspace_dir);
    let name = tool.name.clone();
    let package = tool.package.clone();

    Step::new(
        format!("fetch {}", name),
        format!("could not fetch {} ({})", name, package),
        move || {
            ensure_dir(&workspace_dir)?;
            let (program, args) = fetch
                .split_first()
                .ok_or_else(|| BootstrapError::DependencyMissing("fetch command".to_string()))?;
            // Workspace variable is scoped to the child process only.
            ProcessBuilder::new(program)
                .args(args)
                .arg(&package)
                .env(&workspace_var, workspace_dir.to_string_lossy())
                .exec_checked()
                .map_err(|source| BootstrapError::InstallFailure {
                    what: name.clone(),
                    source: Box::new(source),
                })?;
            Ok(())
        },
    )
    .skip_if(move || !probe.is_empty() && is_present(&probe[0], &probe[1..]))
}

fn completion_wiring_step(ctx: &GlobalContext, config: &Config) -> Step {
    let startup = ctx.startup_file();
    let sentinel = config.profile.completion_sentinel.clone();
    let block = config.profile.completion_block.clone();

    Step::new(
        "wire shell completion",
        format!("could not update {}", startup.display()),
        move || {
            ProfileEditor::new(&startup).ensure_block(&sentinel, &block)?;
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    use crate::core::platform::ProfileKind;

    fn test_ctx() -> (TempDir, GlobalContext) {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_home(tmp.path(), ProfileKind::Default);
        (tmp, ctx)
    }

    #[test]
    fn test_step_sequence_order() {
        let (_tmp, ctx) = test_ctx();
        let config = Config::default();
        let steps = build_steps(&ctx, &config);

        let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "install devspace",
                "wire shell profile",
                "install gvm",
                "install toolchain go1.21.13",
                "install toolchain go1.22.6",
                "select default toolchain go1.22.6",
                "fetch staticcheck",
                "fetch dlv",
                "wire shell completion",
            ]
        );
    }

    #[test]
    fn test_existing_dest_without_probe_is_a_conflict() {
        let (_tmp, ctx) = test_ctx();
        let mut cfg = EnvManagerConfig::default();
        // Probe cannot answer; the directory existing anyway is the
        // inconsistent state the operator must resolve by hand.
        cfg.probe = vec!["definitely-not-a-real-tool-4af1".to_string()];

        let dest = ctx.resolve(&cfg.dest);
        fs::create_dir_all(&dest).unwrap();

        let err = install_env_manager(&dest, &cfg, "git").unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::AlreadyInstalledConflict { .. }
        ));
    }

    #[test]
    fn test_missing_scm_aborts_before_clone() {
        let (_tmp, ctx) = test_ctx();
        let cfg = EnvManagerConfig::default();
        let dest = ctx.resolve(&cfg.dest);

        let err = install_env_manager(&dest, &cfg, "definitely-not-a-real-scm-4af1").unwrap_err();
        match err {
            BootstrapError::DependencyMissing(tool) => {
                assert_eq!(tool, "definitely-not-a-real-scm-4af1")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The destination tree was prepared, but nothing was cloned.
        assert!(!dest.exists());
    }

    #[test]
    fn test_profile_wiring_is_idempotent() {
        let (_tmp, ctx) = test_ctx();
        let config = Config::default();
        fs::write(ctx.startup_file(), "# mine\n").unwrap();

        profile_wiring_step(&ctx, &config).execute().unwrap();
        let once = fs::read_to_string(ctx.startup_file()).unwrap();
        assert!(once.contains(&config.profile.path_line));
        assert!(once.contains(&config.profile.integration_line));

        profile_wiring_step(&ctx, &config).execute().unwrap();
        assert_eq!(fs::read_to_string(ctx.startup_file()).unwrap(), once);
    }

    #[test]
    fn test_completion_block_wired_once() {
        let (_tmp, ctx) = test_ctx();
        let config = Config::default();
        fs::write(ctx.startup_file(), "").unwrap();

        completion_wiring_step(&ctx, &config).execute().unwrap();
        let once = fs::read_to_string(ctx.startup_file()).unwrap();
        assert_eq!(
            once.matches(&config.profile.completion_sentinel).count(),
            1
        );

        completion_wiring_step(&ctx, &config).execute().unwrap();
        assert_eq!(fs::read_to_string(ctx.startup_file()).unwrap(), once);
    }

    #[test]
    fn test_profile_wiring_fails_on_missing_startup_file() {
        let (_tmp, ctx) = test_ctx();
        let config = Config::default();

        let err = profile_wiring_step(&ctx, &config).execute().unwrap_err();
        assert!(matches!(err, BootstrapError::MissingTargetFile(_)));
    }

    #[test]
    fn test_dry_run_executes_nothing() {
        let (_tmp, ctx) = test_ctx();
        let config = Config::default();
        fs::write(ctx.startup_file(), "# untouched\n").unwrap();

        let shell = Shell::for_tests();
        let options = BootstrapOptions { dry_run: true };
        let report = bootstrap(&ctx, &config, &shell, &options).unwrap();

        assert!(report.is_none());
        // No action ran: the startup file is untouched and nothing was
        // cloned under the scratch home.
        assert_eq!(
            fs::read_to_string(ctx.startup_file()).unwrap(),
            "# untouched\n"
        );
        assert!(!ctx.resolve(&config.env_manager.dest).exists());
    }
}
