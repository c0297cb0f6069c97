//! apktool backed analysis and rebuild collaborators.

use super::{
    AnalysisJob, PackageAnalyzer, PackageRebuilder, ProcessRunner, ProcessSpec, RebuildOptions,
    ToolPaths,
};
use crate::error::{BundlerError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Directory inside a project receiving jadx output.
pub const JAVA_SOURCES_DIR: &str = "java_src";

/// File inside a project receiving the quark report.
pub const QUARK_REPORT_FILE: &str = "quarkReport.json";

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Decompiles a package with apktool, optionally followed by jadx and quark.
pub struct ApktoolAnalyzer {
    tools: ToolPaths,
    runner: Arc<dyn ProcessRunner>,
}

impl ApktoolAnalyzer {
    /// Creates an analyzer running tools through `runner`.
    pub fn new(tools: ToolPaths, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { tools, runner }
    }

    /// Commands run for `job`, in order.
    pub fn commands(&self, job: &AnalysisJob<'_>) -> Vec<ProcessSpec> {
        let package = display_name(job.file_path);
        let mut specs = Vec::with_capacity(3);

        let mut args = vec![
            "d".to_string(),
            path_arg(job.file_path),
            "-f".to_string(),
            "-o".to_string(),
            path_arg(job.working_dir),
        ];
        args.extend(job.invocation_args.iter().cloned());
        specs.push(ProcessSpec {
            name: "apktool".to_string(),
            report: format!("Decoding {} into {}", package, job.working_dir.display()),
            command: self.tools.apktool.clone(),
            args,
        });

        if job.decompile_java {
            let mut args = vec![
                path_arg(job.file_path),
                "-d".to_string(),
                path_arg(&job.working_dir.join(JAVA_SOURCES_DIR)),
            ];
            args.extend(job.extra_args.iter().cloned());
            specs.push(ProcessSpec {
                name: "jadx".to_string(),
                report: format!("Decompiling {} to Java sources", package),
                command: self.tools.jadx.clone(),
                args,
            });
        }

        if job.quark_analysis {
            specs.push(ProcessSpec {
                name: "quark".to_string(),
                report: format!("Running quark analysis on {}", package),
                command: self.tools.quark.clone(),
                args: vec![
                    "-a".to_string(),
                    path_arg(job.file_path),
                    "-s".to_string(),
                    "-o".to_string(),
                    path_arg(&job.working_dir.join(QUARK_REPORT_FILE)),
                ],
            });
        }

        specs
    }
}

#[async_trait]
impl PackageAnalyzer for ApktoolAnalyzer {
    async fn process_package(&self, job: &AnalysisJob<'_>) -> Result<()> {
        for spec in self.commands(job) {
            self.runner
                .run_process(&spec)
                .await
                .map_err(|e| BundlerError::PackageProcessing {
                    package: display_name(job.file_path),
                    reason: format!("{} failed: {}", spec.name, e),
                })?;
        }
        Ok(())
    }
}

/// Rebuilds a decoded project with `apktool b`.
pub struct ApktoolRebuilder {
    tools: ToolPaths,
    runner: Arc<dyn ProcessRunner>,
}

impl ApktoolRebuilder {
    /// Creates a rebuilder running apktool through `runner`.
    pub fn new(tools: ToolPaths, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { tools, runner }
    }

    /// The rebuild command for the project owning `descriptor`.
    pub fn command(&self, descriptor: &Path, options: &RebuildOptions) -> ProcessSpec {
        let project_dir = descriptor.parent().unwrap_or(descriptor);
        let mut args = vec!["b".to_string(), path_arg(project_dir)];
        args.extend(options.args.iter().cloned());
        ProcessSpec {
            name: "apktool".to_string(),
            report: format!("Building {}", project_dir.display()),
            command: self.tools.apktool.clone(),
            args,
        }
    }
}

#[async_trait]
impl PackageRebuilder for ApktoolRebuilder {
    async fn rebuild_package(&self, descriptor: &Path, options: &RebuildOptions) -> Result<()> {
        let spec = self.command(descriptor, options);
        self.runner
            .run_process(&spec)
            .await
            .map_err(|e| BundlerError::PackageProcessing {
                package: display_name(descriptor.parent().unwrap_or(descriptor)),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<ProcessSpec>>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl ProcessRunner for Recorder {
        async fn run_process(&self, spec: &ProcessSpec) -> Result<()> {
            self.calls.lock().unwrap().push(spec.clone());
            if self.fail_on == Some(spec.name.as_str()) {
                return Err(BundlerError::Cli(CliError::ExecutionFailed {
                    command: spec.command_line(),
                    reason: "exit code 1".to_string(),
                }));
            }
            Ok(())
        }
    }

    fn job<'a>(args: &'a [String], extra: &'a [String], java: bool, quark: bool) -> AnalysisJob<'a> {
        AnalysisJob {
            file_path: Path::new("/apks/app.apk"),
            working_dir: Path::new("/out/app"),
            invocation_args: args,
            decompile_java: java,
            extra_args: extra,
            quark_analysis: quark,
            flag: false,
        }
    }

    #[tokio::test]
    async fn decode_only_by_default() {
        let runner = Arc::new(Recorder::default());
        let analyzer = ApktoolAnalyzer::new(ToolPaths::default(), runner.clone());
        let args = vec!["-r".to_string()];

        analyzer.process_package(&job(&args, &[], false, false)).await.unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            vec!["d", "/apks/app.apk", "-f", "-o", "/out/app", "-r"]
        );
    }

    #[tokio::test]
    async fn java_and_quark_follow_decode() {
        let runner = Arc::new(Recorder::default());
        let analyzer = ApktoolAnalyzer::new(ToolPaths::default(), runner.clone());
        let extra = vec!["--deobf".to_string()];

        analyzer.process_package(&job(&[], &extra, true, true)).await.unwrap();

        let calls = runner.calls.lock().unwrap();
        let names: Vec<_> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["apktool", "jadx", "quark"]);
        assert_eq!(
            calls[1].args,
            vec!["/apks/app.apk", "-d", "/out/app/java_src", "--deobf"]
        );
        assert_eq!(calls[2].args.last().map(String::as_str), Some("/out/app/quarkReport.json"));
    }

    #[tokio::test]
    async fn failing_step_names_package() {
        let runner = Arc::new(Recorder {
            fail_on: Some("jadx"),
            ..Default::default()
        });
        let analyzer = ApktoolAnalyzer::new(ToolPaths::default(), runner.clone());

        let err = analyzer
            .process_package(&job(&[], &[], true, true))
            .await
            .unwrap_err();

        match err {
            BundlerError::PackageProcessing { package, .. } => assert_eq!(package, "app.apk"),
            other => panic!("unexpected error: {other}"),
        }
        // quark never ran
        assert_eq!(runner.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn rebuild_targets_project_dir() {
        let rebuilder = ApktoolRebuilder::new(ToolPaths::default(), Arc::new(Recorder::default()));
        let spec = rebuilder.command(
            Path::new("/out/app/app/apktool.yml"),
            &RebuildOptions {
                args: vec!["--debug".to_string()],
            },
        );
        assert_eq!(spec.command, PathBuf::from("apktool"));
        assert_eq!(spec.args, vec!["b", "/out/app/app", "--debug"]);
    }
}
