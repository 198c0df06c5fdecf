//! Emulated system counter-timer.
//!
//! Guest software reads timestamps from the `cntpct_el0` counter, which ticks at a fixed
//! 19.2 MHz on the console. Emulated time is tracked in nanoseconds, so every timestamp
//! handed to the guest goes through these conversions.
//!
//! ## References
//! - <https://developer.arm.com/documentation/ddi0601/2020-12/AArch64-Registers/CNTFRQ-EL0--Counter-timer-Frequency-register>

/// Frequency of the emulated system counter-timer, in Hz.
pub const CNTFRQ: u64 = 19_200_000;

/// Converts time from nanoseconds to counter ticks.
///
/// `ticks = ns * 19.2e6 / 1e9`, reduced to `ns * 12 / 625`.
#[inline]
pub const fn ns_to_ticks(ns: u64) -> u64 {
    ((ns as u128 * 12) / 625) as u64
}

/// Converts from counter ticks to nanoseconds.
#[inline]
pub const fn ticks_to_ns(ticks: u64) -> u64 {
    ((ticks as u128 * 625) / 12) as u64
}
