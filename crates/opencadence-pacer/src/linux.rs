//! Linux-specific pacing thread support.

use core::time::Duration;
use libc::{
    CLOCK_MONOTONIC, MCL_CURRENT, MCL_FUTURE, SCHED_FIFO, clock_nanosleep, mlockall, sched_param,
    sched_setscheduler, timespec,
};
use std::time::Instant;

/// Margin kept for the busy-spin tail after the kernel sleep returns.
const SPIN_TAIL: Duration = Duration::from_micros(80);

/// High-precision sleep for the pacing thread.
pub(crate) struct PlatformSleep;

impl PlatformSleep {
    pub(crate) fn new() -> Self {
        Self
    }

    /// Request SCHED_FIFO scheduling and lock memory for the calling thread.
    ///
    /// Returns false when the kernel refuses (typically missing
    /// CAP_SYS_NICE); pacing continues at normal priority.
    pub(crate) fn elevate_priority(&mut self) -> bool {
        let param = sched_param { sched_priority: 50 };

        // SAFETY: sched_setscheduler with pid 0 targets the calling thread
        // and reads only the provided sched_param.
        let accepted = unsafe { sched_setscheduler(0, SCHED_FIFO, &param) } == 0;

        if accepted {
            // SAFETY: mlockall takes no pointers; flags are the documented
            // MCL_* constants.
            unsafe {
                mlockall(MCL_CURRENT | MCL_FUTURE);
            }
        }

        accepted
    }

    /// Sleep until `target` with a busy-spin tail for final precision.
    ///
    /// Returns immediately when the target is already in the past.
    pub(crate) fn sleep_until(&mut self, target: Instant) {
        let now = Instant::now();
        if target <= now {
            return;
        }

        let remaining = target.duration_since(now);

        if remaining > SPIN_TAIL {
            let bulk = remaining.saturating_sub(SPIN_TAIL);
            let ts = timespec {
                tv_sec: bulk.as_secs() as i64,
                tv_nsec: i64::from(bulk.subsec_nanos()),
            };

            // SAFETY: clock_nanosleep reads the request timespec; the
            // remain pointer may be null when TIMER_ABSTIME is not set.
            // A failure here (e.g. EINTR) only shortens the kernel sleep;
            // the spin tail below still reaches the target.
            unsafe {
                clock_nanosleep(CLOCK_MONOTONIC, 0, &ts, std::ptr::null_mut());
            }
        }

        while Instant::now() < target {
            std::hint::spin_loop();
        }
    }
}

impl Default for PlatformSleep {
    fn default() -> Self {
        Self::new()
    }
}
