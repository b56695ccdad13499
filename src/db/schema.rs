diesel::table! {
    contacts (id) {
        id -> Int4,
        #[max_length = 150]
        first_name -> Varchar,
        #[max_length = 150]
        last_name -> Varchar,
        #[max_length = 150]
        email -> Varchar,
        #[max_length = 30]
        phone_number -> Varchar,
        birthday -> Nullable<Date>,
        add_info -> Nullable<Text>,
        created_at -> Timestamptz,
        user_id -> Int4,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        #[max_length = 50]
        username -> Varchar,
        #[max_length = 250]
        email -> Varchar,
        #[max_length = 255]
        password -> Varchar,
        #[max_length = 255]
        avatar -> Nullable<Varchar>,
        #[max_length = 500]
        refresh_token -> Nullable<Varchar>,
        confirmed -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(contacts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(contacts, users,);
