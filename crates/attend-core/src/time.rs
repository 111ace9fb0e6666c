use std::time::{SystemTime, UNIX_EPOCH};

pub type EpochMillis = u64;

pub const MILLIS_PER_DAY: EpochMillis = 86_400_000;

pub fn now_epoch_millis() -> EpochMillis {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as EpochMillis
}

/// Start of the UTC day containing `value`.
pub fn day_start(value: EpochMillis) -> EpochMillis {
    value - value % MILLIS_PER_DAY
}
