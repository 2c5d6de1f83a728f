//! `docker` CLI adapter for container lookup and file copies.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use crate::defaults::ContainerConfig;
use crate::error::{Error, Result};
use crate::target::{ContainerHandle, ContainerRuntime, FileCopy};
use crate::utils::template::{self, TemplateVars};

/// Maps environment names to container names.
#[derive(Debug, Clone)]
pub struct ContainerNaming {
    pub application: String,
    pub template: String,
    pub overrides: HashMap<String, String>,
}

impl ContainerNaming {
    /// The application name falls back to the workspace directory name.
    pub fn from_config(config: &ContainerConfig, workspace: &Path) -> Self {
        let application = config
            .application
            .clone()
            .filter(|a| !a.trim().is_empty())
            .or_else(|| {
                workspace
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| "app".to_string());

        Self {
            application,
            template: config.name_template.clone(),
            overrides: config.environments.clone(),
        }
    }

    pub fn container_name(&self, environment: &str) -> String {
        if let Some(name) = self.overrides.get(environment) {
            return name.clone();
        }

        template::render(
            &self.template,
            &[
                (TemplateVars::APPLICATION, self.application.as_str()),
                (TemplateVars::ENVIRONMENT, environment),
            ],
        )
    }
}

pub struct DockerCli {
    pub naming: ContainerNaming,
    pub program: String,
}

impl DockerCli {
    pub fn new(naming: ContainerNaming) -> Self {
        Self {
            naming,
            program: "docker".to_string(),
        }
    }

    fn output(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new(&self.program).args(args).output().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("{} {}", self.program, args.join(" "))))
                .with_hint("Is docker installed and on PATH?")
        })
    }
}

impl ContainerRuntime for DockerCli {
    fn find_running_target_for(&self, environment: &str) -> Result<Option<ContainerHandle>> {
        let name = self.naming.container_name(environment);
        let name_filter = format!("name=^{}$", regex::escape(&name));

        let out = self.output(&[
            "ps",
            "--filter",
            name_filter.as_str(),
            "--filter",
            "status=running",
            "--format",
            "{{.ID}}\t{{.Names}}",
        ])?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(Error::internal_io(
                stderr,
                Some(format!("list containers for '{}'", environment)),
            )
            .with_hint("Check that the docker daemon is running"));
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        Ok(parse_ps_line(&stdout, &name).map(|(id, name)| ContainerHandle {
            id,
            name,
            environment: environment.to_string(),
        }))
    }

    fn container_name_for(&self, environment: &str) -> Option<String> {
        Some(self.naming.container_name(environment))
    }

    fn copy_file_from(&self, handle: &ContainerHandle, remote_path: &str) -> Result<FileCopy> {
        let out = self.output(&["exec", handle.id.as_str(), "cat", remote_path])?;
        if out.status.success() {
            return Ok(FileCopy::Contents(out.stdout));
        }

        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        log_status!("docker", "cat {} in {} failed: {}", remote_path, handle.name, stderr);
        Ok(FileCopy::Unavailable(if stderr.is_empty() {
            format!(
                "docker exec exited with {}",
                out.status.code().map_or("a signal".to_string(), |c| c.to_string())
            )
        } else {
            stderr
        }))
    }
}

/// First `<id>\t<name>` row whose name matches exactly.
fn parse_ps_line(stdout: &str, expected_name: &str) -> Option<(String, String)> {
    stdout.lines().find_map(|line| {
        let (id, name) = line.trim().split_once('\t')?;
        (name == expected_name && !id.is_empty()).then(|| (id.to_string(), name.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_uses_workspace_directory_name() {
        let naming = ContainerNaming::from_config(&ContainerConfig::default(), Path::new("/srv/shop"));
        assert_eq!(naming.container_name("prod"), "shop-prod");
    }

    #[test]
    fn explicit_override_wins() {
        let config = ContainerConfig {
            application: Some("store".to_string()),
            environments: HashMap::from([("local".to_string(), "store_web_1".to_string())]),
            ..ContainerConfig::default()
        };
        let naming = ContainerNaming::from_config(&config, Path::new("/srv/shop"));
        assert_eq!(naming.container_name("local"), "store_web_1");
        assert_eq!(naming.container_name("stage"), "store-stage");
    }

    #[test]
    fn ps_parsing_requires_exact_name() {
        let stdout = "a1b2\tshop-prod-old\nc3d4\tshop-prod\n";
        assert_eq!(
            parse_ps_line(stdout, "shop-prod"),
            Some(("c3d4".to_string(), "shop-prod".to_string()))
        );
        assert_eq!(parse_ps_line("", "shop-prod"), None);
    }

    #[test]
    fn missing_docker_binary_is_io_error() {
        let runtime = DockerCli {
            naming: ContainerNaming::from_config(&ContainerConfig::default(), Path::new("/srv/shop")),
            program: "dockhand-no-such-docker".to_string(),
        };
        let err = runtime.find_running_target_for("local").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn expected_name_comes_from_naming() {
        let runtime = DockerCli::new(ContainerNaming::from_config(
            &ContainerConfig::default(),
            Path::new("/srv/shop"),
        ));
        assert_eq!(runtime.container_name_for("prod").as_deref(), Some("shop-prod"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_copy_carries_docker_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("docker");
        std::fs::write(
            &fake,
            "#!/bin/sh\necho 'Error response from daemon: container c3d4 is not running' >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runtime = DockerCli {
            naming: ContainerNaming::from_config(&ContainerConfig::default(), Path::new("/srv/shop")),
            program: fake.display().to_string(),
        };
        let handle = ContainerHandle {
            id: "c3d4".to_string(),
            name: "shop-prod".to_string(),
            environment: "prod".to_string(),
        };

        // A freshly written script can briefly report ETXTBSY while other tests fork.
        let copy = (0..5)
            .find_map(|_| match runtime.copy_file_from(&handle, "/app/html/package.json") {
                Ok(copy) => Some(copy),
                Err(_) => {
                    std::thread::sleep(std::time::Duration::from_millis(50));
                    None
                }
            })
            .unwrap();
        assert_eq!(
            copy,
            FileCopy::Unavailable("Error response from daemon: container c3d4 is not running".to_string())
        );
    }
}
