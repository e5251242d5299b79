use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::domain::errors::StorageError;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Build the shared pool. Connections are opened eagerly, so an unreachable
/// database fails here rather than on the first request.
pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, StorageError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| StorageError::Connection(Box::new(e)))
}
