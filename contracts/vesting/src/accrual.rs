//! Vesting accrual math. Pure functions over a schedule and an explicit
//! `now`; no storage or ledger access so the formulas are testable at any
//! instant.

use crate::errors::Error;
use crate::types::Schedule;

/// Raw vested amount at `now`: `amount_per_term * elapsed_terms`, capped at
/// `total_amount`. Multiplication is overflow-checked.
pub fn vested_amount(schedule: &Schedule, now: u64) -> Result<i128, Error> {
    if now < schedule.start {
        return Ok(0);
    }
    let elapsed_terms = (now - schedule.start) / schedule.term_duration;
    let vested = schedule
        .amount_per_term
        .checked_mul(elapsed_terms as i128)
        .ok_or(Error::ArithmeticOverflow)?;
    Ok(vested.min(schedule.total_amount))
}

/// Amount releasable at `now`: vested minus already released. Zero before
/// `start` and for revoked schedules.
pub fn releasable_amount(schedule: &Schedule, now: u64) -> Result<i128, Error> {
    if schedule.revoked || now < schedule.start {
        return Ok(0);
    }
    let vested = vested_amount(schedule, now)?;
    vested
        .checked_sub(schedule.released)
        .ok_or(Error::ArithmeticOverflow)
}
