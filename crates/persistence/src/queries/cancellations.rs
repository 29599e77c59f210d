// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use royale_meals_domain::Money;

use crate::data_models::CancellationRecord;
use crate::diesel_schema::cancellation_requests;
use crate::error::PersistenceError;
use crate::timestamps;

const TABLE: &str = "cancellation_requests";

#[derive(Queryable, Selectable)]
#[diesel(table_name = cancellation_requests)]
struct CancellationRow {
    cancellation_id: i64,
    subscription_id: i64,
    order_ref: String,
    cancelled_order_ids_json: String,
    total_refund_cents: i64,
    refund_eligible_count: i32,
    no_refund_count: i32,
    refund_failed_count: i32,
    reason: String,
    status: String,
    created_at: String,
}

fn count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

impl CancellationRow {
    fn into_record(self) -> Result<CancellationRecord, PersistenceError> {
        Ok(CancellationRecord {
            cancellation_id: self.cancellation_id,
            subscription_id: self.subscription_id,
            order_ref: self.order_ref,
            cancelled_order_ids: serde_json::from_str(&self.cancelled_order_ids_json)?,
            total_refund: Money::from_cents(self.total_refund_cents),
            refund_eligible_count: count(self.refund_eligible_count),
            no_refund_count: count(self.no_refund_count),
            refund_failed_count: count(self.refund_failed_count),
            reason: self.reason,
            status: self.status,
            created_at: timestamps::from_column(TABLE, &self.created_at)?,
        })
    }
}

/// Lists cancellation records, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_cancellations(
    conn: &mut SqliteConnection,
) -> Result<Vec<CancellationRecord>, PersistenceError> {
    let rows: Vec<CancellationRow> = cancellation_requests::table
        .select(CancellationRow::as_select())
        .order((
            cancellation_requests::created_at.desc(),
            cancellation_requests::cancellation_id.desc(),
        ))
        .load(conn)?;

    rows.into_iter().map(CancellationRow::into_record).collect()
}
