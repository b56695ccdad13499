use chrono::{DateTime, NaiveDate, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};

use crate::db::schema::contacts;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = contacts)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub add_info: Option<String>,
    pub user_id: i32,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Contact {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub add_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: i32,
}

/// Full-record replacement for PUT; a `None` birthday/add_info clears the column.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = contacts)]
#[diesel(treat_none_as_null = true)]
pub struct ContactChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub add_info: Option<String>,
}
