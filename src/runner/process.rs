//! Child process plumbing shared by decrypt and encrypt.

use crate::diagnostics::DiagnosticSink;
use crate::error::{Direction, Error, Result, ToolFailure};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Output};
use std::thread;

/// Build the sops argument vector (without the program itself).
pub(crate) fn sops_args(
    input_type: Option<&str>,
    output_type: Option<&str>,
    action: &str,
    target: &Path,
) -> Vec<OsString> {
    let mut args = Vec::with_capacity(6);
    if let Some(input_type) = input_type {
        args.push("--input-type".into());
        args.push(input_type.into());
    }
    if let Some(output_type) = output_type {
        args.push("--output-type".into());
        args.push(output_type.into());
    }
    args.push(action.into());
    args.push(target.as_os_str().to_owned());
    args
}

pub(crate) fn spawn(command: &mut Command, binary: &Path) -> Result<Child> {
    command.spawn().map_err(|source| Error::Spawn {
        binary: binary.to_path_buf(),
        source,
    })
}

/// Write `data` to the child's stdin while collecting its output.
///
/// The write happens on a separate thread so a child that fills its stdout
/// pipe before draining stdin cannot deadlock us. stdin is closed once the
/// payload is written.
pub(crate) fn communicate(mut child: Child, data: &[u8]) -> Result<Output> {
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "sops stdin is not piped"))?;

    let (output, written) = thread::scope(|scope| {
        let writer = scope.spawn(move || write_payload(stdin, data));
        let output = child.wait_with_output();
        (output, writer.join())
    });

    let written = written
        .unwrap_or_else(|_| Err(io::Error::other("stdin writer thread panicked")));
    settle(output?, written)
}

/// A failed write only matters when sops claims success; otherwise the exit
/// status is the better explanation and the caller reports that.
fn settle(output: Output, written: io::Result<()>) -> Result<Output> {
    match written {
        Err(e) if output.status.success() => Err(Error::Io(e)),
        _ => Ok(output),
    }
}

fn write_payload(mut stdin: ChildStdin, data: &[u8]) -> io::Result<()> {
    match stdin.write_all(data) {
        // sops stopped reading; its exit status tells us why.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Exit code of a finished child, `-signal` if it was killed.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

pub(crate) fn forward_stderr(stderr: &str, sink: Option<&dyn DiagnosticSink>) {
    if stderr.is_empty() {
        return;
    }
    if let Some(sink) = sink {
        sink.verbose(stderr);
    }
}

pub(crate) fn check_exit(
    exit_code: i32,
    filename: &str,
    stderr: String,
    direction: Direction,
) -> Result<()> {
    if exit_code == 0 {
        return Ok(());
    }
    Err(ToolFailure::new(filename, exit_code, stderr, direction).into())
}
