use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;

use dockhand::app::build_dispatcher;
use dockhand::console::IoContext;
use dockhand::defaults::DockhandConfig;
use dockhand::dispatch::{Context, Dispatcher, InvocationReport};
use dockhand::process::{OutputMode, ProcessRunner, RunResult};
use dockhand::target::{ContainerHandle, ContainerRuntime, ExecutionTarget, FileCopy};
use dockhand::{ErrorCode, Result};

struct FakeProcess {
    calls: RefCell<Vec<(Vec<String>, ExecutionTarget)>>,
    exit_code: i32,
    stderr: String,
}

impl FakeProcess {
    fn succeeding() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code: 0,
            stderr: String::new(),
        }
    }

    fn failing(exit_code: i32, stderr: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code,
            stderr: stderr.to_string(),
        }
    }

    fn argvs(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|(argv, _)| argv.clone()).collect()
    }
}

impl ProcessRunner for FakeProcess {
    fn spawn(&self, argv: &[String], target: &ExecutionTarget, _mode: OutputMode) -> RunResult {
        self.calls.borrow_mut().push((argv.to_vec(), target.clone()));
        RunResult {
            exit_code: self.exit_code,
            stdout: String::new(),
            stderr: self.stderr.clone(),
        }
    }
}

struct FakeRuntime {
    environments: Vec<&'static str>,
    files: HashMap<&'static str, &'static str>,
    lookups: RefCell<Vec<String>>,
}

impl FakeRuntime {
    fn with_both_files(environments: Vec<&'static str>) -> Self {
        Self {
            environments,
            files: HashMap::from([
                ("/app/html/package.json", "{\"name\":\"shop\"}"),
                ("/app/html/package-lock.json", "{\"lockfileVersion\":3}"),
            ]),
            lookups: RefCell::new(Vec::new()),
        }
    }
}

impl ContainerRuntime for FakeRuntime {
    fn find_running_target_for(&self, environment: &str) -> Result<Option<ContainerHandle>> {
        self.lookups.borrow_mut().push(environment.to_string());
        Ok(self
            .environments
            .iter()
            .any(|e| *e == environment)
            .then(|| ContainerHandle {
                id: format!("id-{}", environment),
                name: format!("shop-{}", environment),
                environment: environment.to_string(),
            }))
    }

    fn container_name_for(&self, environment: &str) -> Option<String> {
        Some(format!("shop-{}", environment))
    }

    fn copy_file_from(&self, _handle: &ContainerHandle, remote_path: &str) -> Result<FileCopy> {
        Ok(match self.files.get(remote_path) {
            Some(contents) => FileCopy::Contents(contents.as_bytes().to_vec()),
            None => FileCopy::Unavailable(format!("cat: {}: No such file or directory", remote_path)),
        })
    }
}

struct Harness {
    dispatcher: Dispatcher,
    io: IoContext,
    config: DockhandConfig,
    process: FakeProcess,
    runtime: FakeRuntime,
    workspace: tempfile::TempDir,
}

impl Harness {
    fn new(process: FakeProcess, runtime: FakeRuntime) -> Self {
        Self {
            dispatcher: build_dispatcher().unwrap(),
            io: IoContext::capture(),
            config: DockhandConfig::default(),
            process,
            runtime,
            workspace: tempfile::tempdir().unwrap(),
        }
    }

    fn run(&self, name: &str, args: &[&str]) -> Result<InvocationReport> {
        let ctx = Context::new(
            &self.dispatcher,
            &self.io,
            &self.config,
            &self.process,
            &self.runtime,
            self.workspace.path(),
        );
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        ctx.execute(name, &args)
    }

    fn build_file(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.workspace.path().join("build").join(name)).ok()
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn install_runs_npm_then_syncs_manifest_and_lockfile() {
    let h = Harness::new(
        FakeProcess::succeeding(),
        FakeRuntime::with_both_files(vec!["local"]),
    );

    let report = h.run("install", &["left-pad"]).unwrap();

    assert_eq!(h.process.argvs(), vec![argv(&["npm", "install", "left-pad"])]);
    assert!(matches!(
        &h.process.calls.borrow()[0].1,
        ExecutionTarget::Container(handle) if handle.name == "shop-local"
    ));

    let trail: Vec<(&str, &[String], usize)> = report
        .trail
        .iter()
        .map(|t| (t.command.as_str(), t.args.as_slice(), t.depth))
        .collect();
    assert_eq!(
        trail,
        vec![
            ("install", &argv(&["left-pad"])[..], 0),
            ("node:npm", &argv(&["install", "left-pad"])[..], 1),
            ("node:npm:write-package", &[][..], 1),
            ("node:npm:write-lock", &[][..], 1),
        ]
    );

    assert_eq!(h.build_file("package.json").as_deref(), Some("{\"name\":\"shop\"}"));
    assert_eq!(
        h.build_file("package-lock.json").as_deref(),
        Some("{\"lockfileVersion\":3}")
    );

    assert_eq!(
        h.io.transcript(),
        vec![
            "# NPM",
            "[local] Using container shop-local",
            "[local] Running 'npm install left-pad'...",
            "[local] Using container shop-local",
            "# Copying Package",
            "Done!",
            "[local] Using container shop-local",
            "# Copying Lockfile",
            "Done!",
            "Dependencies installed.",
        ]
    );
}

#[test]
fn install_with_category_appends_save_flag() {
    let h = Harness::new(
        FakeProcess::succeeding(),
        FakeRuntime::with_both_files(vec!["local"]),
    );

    h.run("install", &["left-pad", "--only=dev"]).unwrap();

    assert_eq!(
        h.process.argvs(),
        vec![argv(&["npm", "install", "left-pad", "--", "--save-dev"])]
    );
}

#[test]
fn missing_environment_fails_before_spawning() {
    let h = Harness::new(
        FakeProcess::succeeding(),
        FakeRuntime::with_both_files(vec!["local"]),
    );

    let err = h.run("node:npm", &["--env=prod", "ci"]).unwrap_err();

    assert_eq!(err.code, ErrorCode::EnvironmentNotFound);
    assert_eq!(err.details["container"], "shop-prod");
    assert_eq!(*h.runtime.lookups.borrow(), vec!["prod"]);
    assert!(h.process.calls.borrow().is_empty());
}

#[test]
fn failing_sync_stops_the_chain_but_keeps_earlier_effects() {
    let mut runtime = FakeRuntime::with_both_files(vec!["local"]);
    runtime.files.remove("/app/html/package.json");
    let h = Harness::new(FakeProcess::succeeding(), runtime);

    let err = h.run("install", &["left-pad"]).unwrap_err();

    assert_eq!(err.code, ErrorCode::SyncFailed);
    assert!(err.message.contains("No such file or directory"));
    assert_eq!(h.process.argvs().len(), 1);
    assert_eq!(h.build_file("package.json"), None);
    assert_eq!(h.build_file("package-lock.json"), None);
    assert!(!h.io.transcript().contains(&"Dependencies installed.".to_string()));
}

#[test]
fn npm_failure_surfaces_stderr_verbatim() {
    let h = Harness::new(
        FakeProcess::failing(1, "npm ERR! 404 Not Found - GET https://registry.npmjs.org/left-padd\n"),
        FakeRuntime::with_both_files(vec!["local"]),
    );

    let err = h.run("install", &["left-padd"]).unwrap_err();

    assert_eq!(err.code, ErrorCode::CommandFailed);
    assert_eq!(
        err.message,
        "npm ERR! 404 Not Found - GET https://registry.npmjs.org/left-padd\n"
    );
    assert_eq!(h.build_file("package.json"), None);
}

#[test]
fn npm_failure_without_stderr_uses_exit_code_message() {
    let h = Harness::new(
        FakeProcess::failing(127, ""),
        FakeRuntime::with_both_files(vec!["local"]),
    );

    let err = h.run("npm", &["outdated"]).unwrap_err();
    assert_eq!(err.message, "npm command failed with exit code 127");
}

#[test]
fn explicit_env_reaches_every_chained_step() {
    let h = Harness::new(
        FakeProcess::succeeding(),
        FakeRuntime::with_both_files(vec!["stage"]),
    );

    h.run("update", &["--env", "stage"]).unwrap();

    assert_eq!(h.process.argvs(), vec![argv(&["npm", "update"])]);
    assert_eq!(*h.runtime.lookups.borrow(), vec!["stage", "stage"]);
    assert_eq!(h.build_file("package.json"), None);
    assert!(h.build_file("package-lock.json").is_some());
}

#[test]
fn configured_default_environment_applies_without_env() {
    let mut h = Harness::new(
        FakeProcess::succeeding(),
        FakeRuntime::with_both_files(vec!["dev"]),
    );
    h.config.default_environment = "dev".to_string();

    h.run("npm-write-lock", &[]).unwrap();

    assert_eq!(*h.runtime.lookups.borrow(), vec!["dev"]);
    assert!(h.build_file("package-lock.json").is_some());
}

#[test]
fn e2e_headless_selects_headless_script_on_host() {
    let h = Harness::new(FakeProcess::succeeding(), FakeRuntime::with_both_files(vec![]));

    h.run("test:e2e", &[]).unwrap();
    h.run("test:e2e", &["--headless"]).unwrap();

    assert_eq!(
        h.process.argvs(),
        vec![
            argv(&["npm", "run", "test:e2e"]),
            argv(&["npm", "run", "test:e2e:headless"]),
        ]
    );
    assert!(h
        .process
        .calls
        .borrow()
        .iter()
        .all(|(_, target)| *target == ExecutionTarget::LocalHost));
    assert!(h.runtime.lookups.borrow().is_empty());
}

#[test]
fn lint_alias_runs_lint_script_locally() {
    let h = Harness::new(FakeProcess::succeeding(), FakeRuntime::with_both_files(vec![]));

    let report = h.run("lint", &[]).unwrap();

    assert_eq!(report.command, "node:npm:lint");
    assert_eq!(h.process.argvs(), vec![argv(&["npm", "run", "lint"])]);
    assert_eq!(h.io.transcript(), vec!["Linting source code"]);
}

#[test]
fn unknown_command_suggests_close_names() {
    let h = Harness::new(FakeProcess::succeeding(), FakeRuntime::with_both_files(vec![]));

    let err = h.run("node:npn", &[]).unwrap_err();

    assert_eq!(err.code, ErrorCode::CommandUnknown);
    assert_eq!(err.details["suggestions"][0], "node:npm");
}
