use diesel::pg::PgConnection;
use diesel::{Connection, ConnectionResult};

pub fn establish_connection(database_url: &str) -> ConnectionResult<PgConnection> {
    PgConnection::establish(database_url)
}
