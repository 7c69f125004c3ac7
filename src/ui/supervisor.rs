use crate::debugger::SessionOptions;
use crate::ui::console;
use anyhow::Context;
use log::info;
use std::path::Path;

/// Source from which debugee is created or attached.
pub enum DebugeeSource<'a> {
    /// Create debugee from executable file with arguments.
    File { path: &'a str, args: &'a [String] },
    /// Attach to an already running process by its pid, executable is optional.
    Process { pid: i32, program: Option<&'a str> },
}

/// Resolve executable with `PATH` lookup if there is no such file.
fn resolve_executable(path: &str) -> anyhow::Result<String> {
    if Path::new(path).exists() {
        return Ok(path.to_string());
    }
    let resolved = which::which(path).with_context(|| format!("Find executable `{path}`"))?;
    Ok(resolved.to_string_lossy().to_string())
}

/// Supervisor prepares and runs a console application.
pub struct Supervisor;

impl Supervisor {
    /// Create and run console application.
    ///
    /// # Arguments
    ///
    /// * `source`: debugee source
    /// * `options`: debugger session settings
    pub fn run(source: DebugeeSource, options: SessionOptions) -> anyhow::Result<()> {
        let resolved: String;
        let source = match source {
            DebugeeSource::File { path, args } => {
                resolved = resolve_executable(path)?;
                DebugeeSource::File {
                    path: &resolved,
                    args,
                }
            }
            DebugeeSource::Process {
                pid,
                program: Some(path),
            } => {
                resolved = resolve_executable(path)?;
                DebugeeSource::Process {
                    pid,
                    program: Some(&resolved),
                }
            }
            source => source,
        };

        info!(target: "debugger", "use debugger `{}`", options.debugger);
        let app = console::AppBuilder::new(options)
            .build(source)
            .context("Build debugger")?;
        app.run()
    }
}
