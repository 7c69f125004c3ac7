#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --------------------------------- generic errors --------------------------------------------
    #[error(transparent)]
    IO(#[from] std::io::Error),

    // --------------------------------- session usage errors --------------------------------------
    #[error("debugger is not running")]
    NotRunning,
    #[error("debugger is already running, use kill or detach first")]
    AlreadyRunning,
    #[error("program is currently running, use stop first")]
    Busy,
    #[error("program to debug is not specified")]
    NoProgram,
    #[error("command queue is full")]
    QueueFull,
    #[error("max variables exceeded ({0})")]
    TooManyVariables(usize),
    #[error("variable #{0} not found")]
    VariableNotFound(usize),

    // --------------------------------- transport errors ------------------------------------------
    #[error("error reading from the debugger: {0}")]
    Read(std::io::Error),
    #[error("error reading from the debugger: end of stream")]
    ReadEof,
    #[error("error writing to the debugger: {0}")]
    Write(std::io::Error),
    #[error("debugger process exited")]
    DebuggerExited,
    #[error("could not start `{0}`: {1}")]
    Spawn(String, std::io::Error),
    #[error("pseudo-terminal error: {0}")]
    Terminal(nix::Error),
    #[error("{0} syscall error: {1}")]
    Syscall(&'static str, nix::Error),
    #[error("executable `{0}` not found")]
    Executable(String),

    // --------------------------------- protocol classification errors ----------------------------
    #[error(
        "the debugger returned \"no debugging symbols found\" implying that the executable \
        has been stripped, or was not compiled with the \"-g\" option for debugging"
    )]
    NoDebugSymbols,
    #[error(
        "the debugger returned \"No symbol table is loaded\" implying that the executable \
        does not exist or is badly formatted"
    )]
    NoSymbolTable,
    #[error(
        "the debugger returned a message implying that the executable was not compiled \
        with the \"-g\" option for debugging"
    )]
    NotCompiledWithDebugInfo,
}

impl Error {
    /// Return a hint to an interface - continue debugging after error or tear down whole session.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::IO(_) => false,
            Error::NotRunning => false,
            Error::AlreadyRunning => false,
            Error::Busy => false,
            Error::NoProgram => false,
            Error::QueueFull => false,
            Error::TooManyVariables(_) => false,
            Error::VariableNotFound(_) => false,

            Error::Read(_) => true,
            Error::ReadEof => true,
            Error::Write(_) => true,
            Error::DebuggerExited => true,
            Error::Spawn(_, _) => true,
            Error::Terminal(_) => true,
            Error::Syscall(_, _) => true,
            Error::Executable(_) => true,
            Error::NoDebugSymbols => true,
            Error::NoSymbolTable => true,
            Error::NotCompiledWithDebugInfo => true,
        }
    }
}

#[macro_export]
macro_rules! _error {
    ($log_fn: path, $res: expr) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "debugger", "{:#}", e);
                None
            }
        }
    };
    ($log_fn: path, $res: expr, $msg: tt) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "debugger", concat!($msg, " {:#}"), e);
                None
            }
        }
    };
}

/// Transforms `Result` into `Option` and logs an error if it occurs.
#[macro_export]
macro_rules! weak_error {
    ($res: expr) => {
        $crate::_error!(log::warn, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::warn, $res, $msg)
    };
}

/// Transforms `Result` into `Option` and put error into debug logs if it occurs.
#[macro_export]
macro_rules! muted_error {
    ($res: expr) => {
        $crate::_error!(log::debug, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::debug, $res, $msg)
    };
}
