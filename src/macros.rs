//! Pipeline timing macros
//!
//! `timed_stage!` wraps one pipeline stage and logs its wall-clock duration in
//! debug builds. Release builds evaluate the stage without the timing.

/// Evaluate a stage expression and log how long it took - debug builds only
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! timed_stage {
    ($stage:expr, $body:expr) => {{
        let __stage_started = std::time::Instant::now();
        let __stage_result = $body;
        log::debug!("{} finished in {:.2?}", $stage, __stage_started.elapsed());
        __stage_result
    }};
}

/// Evaluate a stage expression - no timing in release builds
#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! timed_stage {
    ($stage:expr, $body:expr) => {{
        $body
    }};
}
