//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel
//! uses them for compile-time query validation. Monetary columns are
//! stored as `BIGINT` minor units and statuses as their canonical string
//! identifiers.

diesel::table! {
    /// Registered users with their role and wallet balance.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Registration email, unique across the platform.
        email -> Varchar,
        /// Full display name.
        full_name -> Varchar,
        /// Optional contact phone number.
        phone -> Nullable<Varchar>,
        /// Role identifier: land_owner, investor, or admin.
        role -> Varchar,
        /// Wallet balance in integer minor units.
        balance_minor -> Int8,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Land parcels listed for solar development.
    lands (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        title -> Varchar,
        /// Free-text location used for substring search.
        location -> Varchar,
        land_type -> Varchar,
        ownership_info -> Varchar,
        area_sqft -> Float8,
        /// Asking price in integer minor units.
        total_price_minor -> Int8,
        potential_capacity_kw -> Float8,
        /// Fixed owner payout in integer minor units.
        owner_fixed_payout_minor -> Int8,
        owner_revenue_share_percent -> Float8,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
        /// Lifecycle status identifier.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Investment records tying an investor to a land parcel.
    investments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        land_id -> Uuid,
        investor_id -> Uuid,
        /// Committed amount in integer minor units.
        amount_minor -> Int8,
        /// Lifecycle status identifier.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(lands -> users (owner_id));
diesel::joinable!(investments -> lands (land_id));

diesel::allow_tables_to_appear_in_same_query!(users, lands, investments);
