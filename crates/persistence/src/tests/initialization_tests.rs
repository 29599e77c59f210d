// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_subscription;
use crate::{Persistence, SqlitePersistence};

#[test]
fn test_persistence_initialization() {
    let result = SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_enforced() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    db1.create_subscription(&create_test_subscription("RI-AAAA0001", "cs_1"))
        .unwrap();

    assert!(db1.get_subscription_by_ref("RI-AAAA0001").unwrap().is_some());
    assert!(db2.get_subscription_by_ref("RI-AAAA0001").unwrap().is_none());
}

#[test]
fn test_migrations_seed_the_weekly_menu() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let menu = persistence.list_menu_items(false).unwrap();

    assert_eq!(menu.len(), 5, "one seeded item per weekday");
}

#[test]
fn test_file_database_reopens_with_data() {
    let path = std::env::temp_dir().join(format!(
        "royale_meals_persistence_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .create_subscription(&create_test_subscription("RI-FILE0001", "cs_file"))
            .unwrap();
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    assert!(reopened.get_subscription_by_ref("RI-FILE0001").unwrap().is_some());

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}
