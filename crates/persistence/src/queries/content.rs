// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Menu, site content and contact form queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use royale_meals_domain::{ContactSubmission, MenuItem, Money, SiteContent, sort_menu_by_day};
use tracing::debug;

use crate::diesel_schema::{contact_submissions, menu_items, site_content};
use crate::error::PersistenceError;
use crate::timestamps;

#[derive(Queryable, Selectable)]
#[diesel(table_name = menu_items)]
struct MenuItemRow {
    menu_item_id: i64,
    delivery_day: String,
    appetizer: String,
    curry: String,
    biryani: String,
    egg: String,
    naan: String,
    price_cents: i64,
    discount_percent: i32,
    description: String,
    image_url: Option<String>,
    is_active: i32,
}

impl MenuItemRow {
    fn into_domain(self) -> Result<MenuItem, PersistenceError> {
        Ok(MenuItem {
            id: self.menu_item_id,
            day: self
                .delivery_day
                .parse()
                .map_err(|e| PersistenceError::corrupt("menu_items", &e))?,
            appetizer: self.appetizer,
            curry: self.curry,
            biryani: self.biryani,
            egg: self.egg,
            naan: self.naan,
            price: Money::from_cents(self.price_cents),
            discount_percent: u8::try_from(self.discount_percent).map_err(|_| {
                PersistenceError::CorruptRow {
                    table: "menu_items",
                    message: format!("discount_percent {} out of range", self.discount_percent),
                }
            })?,
            description: self.description,
            image_url: self.image_url,
            is_active: self.is_active != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = site_content)]
struct SiteContentRow {
    content_key: String,
    content_value: String,
    content_type: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = contact_submissions)]
struct ContactRow {
    contact_id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
    is_read: i32,
    created_at: String,
}

/// Lists menu items Monday through Friday.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `active_only` - Whether to hide inactive items
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_menu_items(
    conn: &mut SqliteConnection,
    active_only: bool,
) -> Result<Vec<MenuItem>, PersistenceError> {
    let mut query = menu_items::table
        .select(MenuItemRow::as_select())
        .into_boxed();
    if active_only {
        query = query.filter(menu_items::is_active.eq(1));
    }

    let rows: Vec<MenuItemRow> = query.load(conn)?;
    let mut items: Vec<MenuItem> = rows
        .into_iter()
        .map(MenuItemRow::into_domain)
        .collect::<Result<_, _>>()?;
    sort_menu_by_day(&mut items);

    debug!(count = items.len(), active_only, "Listed menu items");
    Ok(items)
}

/// Retrieves a menu item by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the item is not found.
pub fn get_menu_item(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
) -> Result<Option<MenuItem>, PersistenceError> {
    menu_items::table
        .find(menu_item_id)
        .select(MenuItemRow::as_select())
        .first(conn)
        .optional()?
        .map(MenuItemRow::into_domain)
        .transpose()
}

/// Lists every site content entry, ordered by key.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_site_content(conn: &mut SqliteConnection) -> Result<Vec<SiteContent>, PersistenceError> {
    let rows: Vec<SiteContentRow> = site_content::table
        .select(SiteContentRow::as_select())
        .order(site_content::content_key.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| SiteContent {
            key: row.content_key,
            value: row.content_value,
            content_type: row.content_type,
        })
        .collect())
}

/// Lists contact form submissions, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_contact_submissions(
    conn: &mut SqliteConnection,
) -> Result<Vec<ContactSubmission>, PersistenceError> {
    let rows: Vec<ContactRow> = contact_submissions::table
        .select(ContactRow::as_select())
        .order((
            contact_submissions::created_at.desc(),
            contact_submissions::contact_id.desc(),
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(ContactSubmission {
                id: row.contact_id,
                name: row.name,
                email: row.email,
                phone: row.phone,
                subject: row.subject,
                message: row.message,
                is_read: row.is_read != 0,
                created_at: timestamps::from_column("contact_submissions", &row.created_at)?,
            })
        })
        .collect()
}

/// Counts unread contact form submissions.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_unread_contacts(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(contact_submissions::table
        .filter(contact_submissions::is_read.eq(0))
        .count()
        .get_result(conn)?)
}
