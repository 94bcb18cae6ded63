//! Database operations for the household profile.

use rusqlite::{Connection, OptionalExtension, params};

use crate::{Error, profile::Profile};

/// Get the household profile, or the empty default if it has not been saved yet.
pub fn get_profile(connection: &Connection) -> Result<Profile, Error> {
    let profile = connection
        .prepare(
            "SELECT user_name, spouse_name, user_color, spouse_color FROM profile WHERE id = 1;",
        )?
        .query_row([], |row| {
            Ok(Profile {
                user_name: row.get(0)?,
                spouse_name: row.get(1)?,
                user_color: row.get(2)?,
                spouse_color: row.get(3)?,
            })
        })
        .optional()?;

    Ok(profile.unwrap_or_default())
}

/// Create or replace the household profile.
pub fn save_profile(profile: &Profile, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO profile (id, user_name, spouse_name, user_color, spouse_color)
        VALUES (1, ?1, ?2, ?3, ?4)
        ON CONFLICT(id) DO UPDATE SET
            user_name = excluded.user_name,
            spouse_name = excluded.spouse_name,
            user_color = excluded.user_color,
            spouse_color = excluded.spouse_color;",
        params![
            profile.user_name,
            profile.spouse_name,
            profile.user_color,
            profile.spouse_color
        ],
    )?;

    Ok(())
}

/// Create the profile table. It holds at most one row.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            user_name TEXT,
            spouse_name TEXT,
            user_color TEXT,
            spouse_color TEXT
        );",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::profile::{Profile, ProfileColor};

    use super::{create_profile_table, get_profile, save_profile};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_profile_table(&connection).expect("Could not create profile table");
        connection
    }

    #[test]
    fn missing_profile_is_default() {
        let connection = get_test_connection();

        assert_eq!(get_profile(&connection), Ok(Profile::default()));
    }

    #[test]
    fn save_then_get() {
        let connection = get_test_connection();
        let profile = Profile {
            user_name: Some("Alex".to_owned()),
            spouse_name: Some("Sam".to_owned()),
            user_color: Some(ProfileColor::Success),
            spouse_color: None,
        };

        save_profile(&profile, &connection).unwrap();

        assert_eq!(get_profile(&connection), Ok(profile));
    }

    #[test]
    fn save_replaces_existing_profile() {
        let connection = get_test_connection();
        save_profile(
            &Profile {
                user_name: Some("Alex".to_owned()),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();
        let updated = Profile {
            user_name: Some("Alexis".to_owned()),
            ..Default::default()
        };

        save_profile(&updated, &connection).unwrap();

        assert_eq!(get_profile(&connection), Ok(updated));
        let row_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM profile", [], |row| row.get(0))
            .unwrap();
        assert_eq!(row_count, 1);
    }

    #[test]
    fn only_one_row_is_allowed() {
        let connection = get_test_connection();

        let result = connection.execute("INSERT INTO profile (id) VALUES (2)", ());

        assert!(result.is_err());
    }
}
