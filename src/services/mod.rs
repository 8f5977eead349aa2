pub mod booking_service;
pub mod convert;
pub mod payment_service;
pub mod seat_service;

use chrono::Utc;
use uuid::Uuid;

/// Human-facing reference such as `TKT-20261018-1f3a9c0b52d4`.
pub(crate) fn build_code(prefix: &str, id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = id.simple().to_string();
    let short = &suffix[..12];
    format!("{}-{}-{}", prefix, date, short)
}

/// Drops repeated ids while keeping the caller's order.
pub fn dedupe_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
