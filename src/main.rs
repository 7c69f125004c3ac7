use clap::Parser;
use gdbpilot::debugger::SessionOptions;
use gdbpilot::ui::config::{self, FileConfig, UIConfig};
use gdbpilot::ui::supervisor::{DebugeeSource, Supervisor};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Attach to running process PID
    #[clap(long, short)]
    pid: Option<i32>,

    /// Debugger executable name or path
    #[clap(long, env = "GDBPILOT_GDB")]
    gdb: Option<String>,

    /// Run program on a dedicated pseudo-terminal and print its output
    #[clap(long)]
    show_output: bool,

    /// Do not stop at `main` after program start
    #[clap(long)]
    no_stop_at_main: bool,

    /// Echo debugger traffic to the console
    #[clap(long)]
    echo: bool,

    /// Path to a configuration file, `~/.config/gdbpilot/config.toml` is used by default
    #[clap(long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[clap(long)]
    no_color: bool,

    /// Executable file (program to debug)
    program: Option<String>,

    /// Arguments are passed to a program binary
    #[arg(raw = true)]
    args: Vec<String>,
}

impl Args {
    /// Merge file settings with command line flags, flags take precedence.
    fn session_options(&self, file_config: &FileConfig) -> SessionOptions {
        let mut options = file_config.apply(SessionOptions::default());
        if let Some(gdb) = &self.gdb {
            options.debugger = gdb.clone();
        }
        if self.show_output {
            options.show_debugee_output = true;
        }
        if self.no_stop_at_main {
            options.stop_at_entry = false;
        }
        if self.echo {
            options.echo_to_console = true;
        }
        options.debugger = config::resolve_debugger(&options.debugger);
        options
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let file_config = FileConfig::from_file(args.config.as_deref()).unwrap_or_default();
    config::set(UIConfig {
        colored: !args.no_color && file_config.color.unwrap_or(true),
    });
    let options = args.session_options(&file_config);

    let source = match (args.pid, args.program.as_deref()) {
        (Some(pid), program) => DebugeeSource::Process { pid, program },
        (None, Some(path)) => DebugeeSource::File {
            path,
            args: &args.args,
        },
        (None, None) => {
            anyhow::bail!("please specify a program to debug or a process id with `--pid`")
        }
    };

    Supervisor::run(source, options)
}
