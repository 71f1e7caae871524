//! Diesel table definitions. Keep in step with `backend/migrations`.

diesel::table! {
    /// Account holders. Balances are nullable for rows created before the
    /// wallet columns existed; readers treat null as zero.
    users (id) {
        id -> Uuid,
        email -> Text,
        is_paid -> Bool,
        balance -> Nullable<Numeric>,
        total_earned -> Nullable<Numeric>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only ledger of bonuses and payments.
    transactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[sql_name = "type"]
        kind -> Text,
        amount -> Numeric,
        description -> Text,
        reference -> Text,
        paystack_reference -> Nullable<Text>,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(transactions -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(transactions, users);
