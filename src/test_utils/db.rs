use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, User, ValidatedPassword, create_user},
    db::initialize,
};

/// The lowest cost bcrypt accepts, to keep the tests fast.
const TEST_HASH_COST: u32 = 4;

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    connection
}

/// Register a user with `email` and `password`, skipping the password strength check.
pub(crate) fn insert_test_user(email: &str, password: &str, connection: &Connection) -> User {
    let email = email
        .parse::<EmailAddress>()
        .expect("Could not parse test email");
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(password), TEST_HASH_COST)
        .expect("Could not hash test password");

    create_user(email, password_hash, connection).expect("Could not create test user")
}

#[cfg(test)]
mod tests {
    use crate::auth::get_user_by_email;

    use super::{get_test_connection, insert_test_user};

    #[test]
    fn inserts_user_with_weak_password() {
        let connection = get_test_connection();

        let user = insert_test_user("weak@example.com", "hunter2", &connection);

        let got = get_user_by_email("weak@example.com", &connection).unwrap();
        assert_eq!(got.id, user.id);
        assert!(got.password_hash.verify("hunter2").unwrap());
    }
}
