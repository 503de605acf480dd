use std::process::Command;
use std::thread;

use log::{debug, error, info, warn};

/// Starts `argv` detached from the event loop. The child is waited on from a
/// short-lived thread so it never lingers as a zombie.
pub fn launch(argv: &[&str]) {
    let Some((program, args)) = argv.split_first() else {
        warn!("Refusing to spawn an empty command");
        return;
    };

    info!("Spawning command: {argv:?}");
    let mut child = match Command::new(program).args(args).spawn() {
        Ok(child) => child,
        Err(e) => {
            error!("Failed to spawn {program}: {e:?}");
            return;
        }
    };

    let pid = child.id();
    let reaper = thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!("Child {pid} exited with {status}"),
            Err(e) => warn!("Failed to wait on child {pid}: {e:?}"),
        });
    if let Err(e) = reaper {
        warn!("Failed to start reaper for child {pid}: {e:?}");
    }
}

#[cfg(test)]
mod spawn_tests {
    use super::*;

    #[test]
    fn test_empty_command_is_ignored() {
        launch(&[]);
    }

    #[test]
    fn test_missing_program_does_not_panic() {
        launch(&["/nonexistent/framewm-test-binary"]);
    }

    #[test]
    fn test_launch_returns_without_waiting() {
        launch(&["/bin/sh", "-c", "exit 0"]);
    }
}
