//! User accounts: the model, queries and the profile endpoints.

mod core;
mod profile_endpoint;

pub use core::{
    NewUser, User, UserId, activate_user, create_user_table, deactivate_user, get_user_by_email,
    get_user_by_id, insert_user, nickname_taken, set_last_login,
};
pub use profile_endpoint::{
    ProfileUpdate, delete_profile_endpoint, get_profile_endpoint, update_profile_endpoint,
};

#[cfg(test)]
pub mod test_support {
    //! Helpers for creating users directly in the database in tests.

    use rusqlite::Connection;

    use super::{NewUser, User, activate_user, insert_user};

    /// Insert a user with a bcrypt hash at the minimum cost.
    pub fn create_test_user(
        email: &str,
        password: &str,
        nickname: &str,
        active: bool,
        connection: &Connection,
    ) -> User {
        let password_hash = bcrypt::hash(password, 4).expect("could not hash password");

        let user = insert_user(
            NewUser {
                email: email.to_owned(),
                password_hash,
                nickname: nickname.to_owned(),
                name: String::new(),
                phone_number: String::new(),
            },
            connection,
        )
        .expect("could not insert user");

        if active {
            activate_user(user.id, connection).expect("could not activate user");
        }

        user
    }
}
