use chrono::{SubsecRound, TimeDelta, Utc};
use sea_orm::{
    DatabaseConnection, EntityTrait, QueryOrder, Select, entity::prelude::DateTimeWithTimeZone,
};

use super::base_traits::{HasCreatedAtColumn, TimestampedActiveModel};

/// Postgres `timestamptz` keeps microseconds; storing anything finer would
/// not survive a round trip.
const TIMESTAMP_DIGITS: u16 = 6;

pub trait DaoBase: Clone + Send + Sync + Sized {
    type Entity: EntityTrait + Send + Sync;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;
}

pub fn now_timestamp() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset().trunc_subsecs(TIMESTAMP_DIGITS)
}

/// A timestamp strictly later than `previous`, even if the clock has not
/// moved (or moved backwards) since it was taken.
pub fn timestamp_after(previous: DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    let now = now_timestamp();
    if now > previous {
        return now;
    }
    previous.trunc_subsecs(TIMESTAMP_DIGITS) + TimeDelta::microseconds(1)
}

/// Sets `created_at` and `updated_at` to the same instant.
pub fn stamp_new<A: TimestampedActiveModel>(active: &mut A) -> DateTimeWithTimeZone {
    let now = now_timestamp();
    active.set_created_at(now);
    active.set_updated_at(now);
    now
}

pub fn newest_first<E: HasCreatedAtColumn>(select: Select<E>) -> Select<E> {
    select.order_by_desc(E::created_at_column())
}
