//! Diesel table definitions for the user store.
//!
//! Keep in sync with `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Int4,
        user_name -> Varchar,
        user_email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        time_zone_id -> Varchar,
    }
}

diesel::table! {
    followers (id) {
        id -> Int4,
        user_id -> Int4,
        follower_user_name -> Nullable<Varchar>,
    }
}

diesel::table! {
    user_repos (id) {
        id -> Int4,
        user_id -> Int4,
        repo_name -> Nullable<Varchar>,
    }
}

diesel::joinable!(followers -> users (user_id));
diesel::joinable!(user_repos -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, followers, user_repos);
