// src/exec/wait.rs

//! Blocking wait on the supervised child, with CPU accounting where the
//! platform provides it.

use std::io;
use std::process::{Child, ExitStatus};
use std::time::Duration;

/// CPU time consumed by the child (and its reaped descendants).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuUsage {
    pub user: Duration,
    pub system: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct Finished {
    pub status: ExitStatus,
    pub usage: Option<CpuUsage>,
}

/// Reap `child` with `wait4(2)` so the kernel hands us its `rusage`.
///
/// Must run on a blocking thread. `child` must not have been waited on yet.
#[cfg(unix)]
pub fn wait_with_usage(child: &mut Child) -> io::Result<Finished> {
    use std::os::unix::process::ExitStatusExt;

    let pid = child.id() as libc::pid_t;
    let mut raw_status: libc::c_int = 0;
    // SAFETY: rusage is plain old data; all-zero is a valid value.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };

    loop {
        // SAFETY: both out-pointers refer to live stack locals.
        let rc = unsafe { libc::wait4(pid, &mut raw_status, 0, &mut usage) };
        if rc != -1 {
            break;
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }

    Ok(Finished {
        status: ExitStatus::from_raw(raw_status),
        usage: Some(CpuUsage {
            user: timeval_to_duration(usage.ru_utime),
            system: timeval_to_duration(usage.ru_stime),
        }),
    })
}

#[cfg(not(unix))]
pub fn wait_with_usage(child: &mut Child) -> io::Result<Finished> {
    let status = child.wait()?;
    Ok(Finished {
        status,
        usage: None,
    })
}

#[cfg(unix)]
fn timeval_to_duration(tv: libc::timeval) -> Duration {
    let secs = u64::try_from(tv.tv_sec).unwrap_or(0);
    let micros = u64::try_from(tv.tv_usec).unwrap_or(0);
    Duration::from_secs(secs) + Duration::from_micros(micros)
}
