use diesel::prelude::*;
use jiff_diesel::Timestamp;

/// Favorite row as stored in the database
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub added_at: Timestamp,
}

/// Insert model; `added_at` is filled by the database default
#[derive(Debug, Insertable, Clone, Copy)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: i64,
    pub product_id: i64,
}
