//! Configuration file support for Rigup.
//!
//! All external collaborators - repository URLs, the pinned branch,
//! toolchain versions, auxiliary tools, and the wired profile lines - are
//! configuration data, not code. The binary ships workable defaults and
//! reads overrides from `~/.rigup/config.toml`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Rigup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The environment manager installed from git
    pub env_manager: EnvManagerConfig,

    /// The language toolchain and its version manager
    pub toolchain: ToolchainConfig,

    /// Shell startup-file wiring
    pub profile: ProfileConfig,

    /// Auxiliary command-line tools fetched through the toolchain
    pub tools: Vec<ToolConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            env_manager: EnvManagerConfig::default(),
            toolchain: ToolchainConfig::default(),
            profile: ProfileConfig::default(),
            tools: default_tools(),
        }
    }
}

/// The git-hosted environment manager this bootstrap installs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvManagerConfig {
    /// Display name of the tool
    pub name: String,

    /// Clone URL (SSH)
    pub repo_url: String,

    /// Pinned branch to clone
    pub branch: String,

    /// Checkout destination, `~/`-relative
    pub dest: String,

    /// Presence probe: program plus arguments, judged by exit status
    pub probe: Vec<String>,

    /// Install command run inside the checkout after cloning
    pub install: Vec<String>,
}

impl Default for EnvManagerConfig {
    fn default() -> Self {
        EnvManagerConfig {
            name: "devspace".to_string(),
            repo_url: "git@github.com:rigup-dev/devspace.git".to_string(),
            branch: "stable/2".to_string(),
            dest: "~/src/devspace".to_string(),
            probe: vec!["devspace".to_string(), "--version".to_string()],
            install: vec![
                "pip".to_string(),
                "install".to_string(),
                "--user".to_string(),
                "-e".to_string(),
                ".".to_string(),
            ],
        }
    }
}

/// The toolchain version manager and the pinned versions it installs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Version manager executable name
    pub manager: String,

    /// Presence probe for the version manager
    pub manager_probe: Vec<String>,

    /// HTTPS URL of the version manager's installer script
    pub installer_url: String,

    /// Pinned toolchain versions to install, in order
    pub versions: Vec<String>,

    /// Version selected as the default after installation
    pub default_version: String,

    /// Workspace environment variable required by the package-fetch
    /// mechanism, set only for the duration of each fetch
    pub workspace_var: String,

    /// Workspace directory the variable points at, `~/`-relative
    pub workspace_dir: String,

    /// Package-fetch command; the tool's package spec is appended
    pub fetch: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig {
            manager: "gvm".to_string(),
            manager_probe: vec!["gvm".to_string(), "version".to_string()],
            installer_url:
                "https://raw.githubusercontent.com/moovweb/gvm/master/binscripts/gvm-installer"
                    .to_string(),
            versions: vec!["go1.21.13".to_string(), "go1.22.6".to_string()],
            default_version: "go1.22.6".to_string(),
            workspace_var: "GOPATH".to_string(),
            workspace_dir: "~/devws".to_string(),
            fetch: vec!["go".to_string(), "install".to_string()],
        }
    }
}

/// Lines wired into the shell startup file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// PATH augmentation line
    pub path_line: String,

    /// Environment-manager shell integration line
    pub integration_line: String,

    /// Sentinel comment guarding the completion block
    pub completion_sentinel: String,

    /// Multi-line completion-loading snippet (starts with the sentinel)
    pub completion_block: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        let sentinel = "# devspace shell completion".to_string();
        let block = format!(
            "{}\nif [ -f \"$HOME/src/devspace/etc/completion.sh\" ]; then\n  . \"$HOME/src/devspace/etc/completion.sh\"\nfi",
            sentinel
        );
        ProfileConfig {
            path_line: "export PATH=\"$HOME/.local/bin:$PATH\"".to_string(),
            integration_line: "eval \"$(devspace shell-init)\"".to_string(),
            completion_sentinel: sentinel,
            completion_block: block,
        }
    }
}

/// One auxiliary tool fetched through the toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Display name
    pub name: String,

    /// Package spec passed to the fetch command
    pub package: String,

    /// Presence probe; skipped when it answers
    pub probe: Vec<String>,
}

fn default_tools() -> Vec<ToolConfig> {
    vec![
        ToolConfig {
            name: "staticcheck".to_string(),
            package: "honnef.co/go/tools/cmd/staticcheck@latest".to_string(),
            probe: vec!["staticcheck".to_string(), "-version".to_string()],
        },
        ToolConfig {
            name: "dlv".to_string(),
            package: "github.com/go-delve/delve/cmd/dlv@latest".to_string(),
            probe: vec!["dlv".to_string(), "version".to_string()],
        },
    ]
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't
    /// exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}
