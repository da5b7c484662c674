//! Diesel table definitions.
//!
//! Only the migration ledger is declared here; seed tables are addressed by
//! name at runtime.

diesel::table! {
    /// Applied-migrations ledger.
    schema_migrations (id) {
        id -> Int4,
        #[max_length = 255]
        name -> Varchar,
        executed_at -> Timestamptz,
    }
}
