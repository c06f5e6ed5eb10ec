//! Process launching. Every launch runs on its own short-lived thread and
//! reports failures only to the log.

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to start {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shell refused to open {0}")]
    ShellOpen(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaunchKind {
    /// Started directly with its own directory as working dir.
    Executable,
    /// Handed to the platform shell (documents, folders, `.lnk` shortcuts).
    Shell,
}

/// Starts `target` without blocking the caller.
pub fn launch(target: &str) {
    let target = target.trim();
    if target.is_empty() {
        return;
    }
    let path = PathBuf::from(target);
    let spawned = thread::Builder::new()
        .name("squid-launch".to_string())
        .spawn(move || match launch_blocking(&path) {
            Ok(()) => info!("launched {}", path.display()),
            Err(err) => warn!("{err}"),
        });
    if let Err(err) = spawned {
        warn!("cannot spawn launch thread for {target}: {err}");
    }
}

fn launch_blocking(path: &Path) -> Result<(), LaunchError> {
    match launch_kind(path) {
        LaunchKind::Shell => shell_open(path),
        LaunchKind::Executable => match spawn_detached(path) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("{err}; retrying through the shell");
                shell_open(path)
            }
        },
    }
}

fn launch_kind(path: &Path) -> LaunchKind {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("lnk") => LaunchKind::Shell,
        Some("exe") | Some("bat") | Some("cmd") => LaunchKind::Executable,
        _ if is_unix_executable(path) => LaunchKind::Executable,
        _ => LaunchKind::Shell,
    }
}

#[cfg(unix)]
fn is_unix_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_unix_executable(_path: &Path) -> bool {
    false
}

fn spawn_detached(path: &Path) -> Result<(), LaunchError> {
    let mut command = Command::new(path);
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        command.current_dir(dir);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
        .map_err(|source| LaunchError::Spawn {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(windows)]
fn shell_open(path: &Path) -> Result<(), LaunchError> {
    use std::os::windows::ffi::OsStrExt;
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    let operation: Vec<u16> = "open".encode_utf16().chain(std::iter::once(0)).collect();
    let path_wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let cwd_wide: Option<Vec<u16>> = path.parent().map(|dir| {
        dir.as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    });

    // ShellExecuteW reports success with a value greater than 32.
    let code = unsafe {
        ShellExecuteW(
            HWND(std::ptr::null_mut()),
            PCWSTR(operation.as_ptr()),
            PCWSTR(path_wide.as_ptr()),
            PCWSTR(std::ptr::null()),
            cwd_wide
                .as_ref()
                .map(|w| PCWSTR(w.as_ptr()))
                .unwrap_or(PCWSTR(std::ptr::null())),
            SW_SHOWNORMAL,
        )
    };
    if code.0 as isize > 32 {
        Ok(())
    } else {
        Err(LaunchError::ShellOpen(path.to_path_buf()))
    }
}

#[cfg(not(windows))]
fn shell_open(path: &Path) -> Result<(), LaunchError> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let status = Command::new(opener)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| LaunchError::Spawn {
            path: PathBuf::from(opener),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::ShellOpen(path.to_path_buf()))
    }
}
