// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::NewCancellation;
use crate::diesel_schema::cancellation_requests;
use crate::error::PersistenceError;
use crate::timestamps;

/// Status recorded on every cancellation request handled synchronously.
pub const CANCELLATION_STATUS_PROCESSED: &str = "processed";

fn count_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Records a processed cancellation request.
///
/// # Returns
///
/// The assigned cancellation ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_cancellation(
    conn: &mut SqliteConnection,
    cancellation: &NewCancellation,
) -> Result<i64, PersistenceError> {
    let order_ids_json: String = serde_json::to_string(&cancellation.cancelled_order_ids)?;

    diesel::insert_into(cancellation_requests::table)
        .values((
            cancellation_requests::subscription_id.eq(cancellation.subscription_id),
            cancellation_requests::order_ref.eq(&cancellation.order_ref),
            cancellation_requests::cancelled_order_ids_json.eq(&order_ids_json),
            cancellation_requests::total_refund_cents.eq(cancellation.total_refund.cents()),
            cancellation_requests::refund_eligible_count
                .eq(count_column(cancellation.refund_eligible_count)),
            cancellation_requests::no_refund_count.eq(count_column(cancellation.no_refund_count)),
            cancellation_requests::refund_failed_count
                .eq(count_column(cancellation.refund_failed_count)),
            cancellation_requests::reason.eq(&cancellation.reason),
            cancellation_requests::status.eq(CANCELLATION_STATUS_PROCESSED),
            cancellation_requests::created_at.eq(timestamps::to_column(cancellation.created_at)),
        ))
        .execute(conn)?;

    let cancellation_id: i64 = last_insert_rowid(conn)?;
    info!(
        cancellation_id,
        order_ref = %cancellation.order_ref,
        orders = cancellation.cancelled_order_ids.len(),
        "Cancellation recorded"
    );
    Ok(cancellation_id)
}
