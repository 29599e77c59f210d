// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Menu, site content and contact form mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use royale_meals_domain::{MenuItem, SiteContent};
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::NewContactSubmission;
use crate::diesel_schema::{contact_submissions, menu_items, site_content};
use crate::error::PersistenceError;
use crate::timestamps;

/// Writes every editable field of a menu item.
///
/// # Errors
///
/// Returns `NotFound` if no row has the item's ID.
pub fn update_menu_item(conn: &mut SqliteConnection, item: &MenuItem) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(menu_items::table.find(item.id))
        .set((
            menu_items::appetizer.eq(&item.appetizer),
            menu_items::curry.eq(&item.curry),
            menu_items::biryani.eq(&item.biryani),
            menu_items::egg.eq(&item.egg),
            menu_items::naan.eq(&item.naan),
            menu_items::price_cents.eq(item.price.cents()),
            menu_items::discount_percent.eq(i32::from(item.discount_percent)),
            menu_items::description.eq(&item.description),
            menu_items::image_url.eq(&item.image_url),
            menu_items::is_active.eq(i32::from(item.is_active)),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Menu item {}", item.id)));
    }

    info!(menu_item_id = item.id, day = %item.day, "Menu item updated");
    Ok(())
}

/// Inserts or replaces a site content entry by key.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_site_content(
    conn: &mut SqliteConnection,
    content: &SiteContent,
    now: DateTime<Utc>,
) -> Result<(), PersistenceError> {
    let updated_at: String = timestamps::to_column(now);

    diesel::insert_into(site_content::table)
        .values((
            site_content::content_key.eq(&content.key),
            site_content::content_value.eq(&content.value),
            site_content::content_type.eq(&content.content_type),
            site_content::updated_at.eq(&updated_at),
        ))
        .on_conflict(site_content::content_key)
        .do_update()
        .set((
            site_content::content_value.eq(&content.value),
            site_content::content_type.eq(&content.content_type),
            site_content::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    debug!(key = %content.key, "Site content saved");
    Ok(())
}

/// Stores a contact form submission as unread.
///
/// # Returns
///
/// The assigned submission ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_contact_submission(
    conn: &mut SqliteConnection,
    submission: &NewContactSubmission,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(contact_submissions::table)
        .values((
            contact_submissions::name.eq(&submission.name),
            contact_submissions::email.eq(&submission.email),
            contact_submissions::phone.eq(&submission.phone),
            contact_submissions::subject.eq(&submission.subject),
            contact_submissions::message.eq(&submission.message),
            contact_submissions::is_read.eq(0),
            contact_submissions::created_at.eq(timestamps::to_column(submission.created_at)),
        ))
        .execute(conn)?;

    let contact_id: i64 = last_insert_rowid(conn)?;
    info!(contact_id, "Contact submission stored");
    Ok(contact_id)
}

/// Marks a contact submission as read.
///
/// # Errors
///
/// Returns `NotFound` if no row has the ID.
pub fn mark_contact_read(conn: &mut SqliteConnection, contact_id: i64) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(contact_submissions::table.find(contact_id))
        .set(contact_submissions::is_read.eq(1))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Contact submission {contact_id}"
        )));
    }
    Ok(())
}
