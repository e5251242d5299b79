pub mod diesel_storer;
pub mod memory_storer;
pub mod models;

pub use diesel_storer::DieselStorer;
pub use memory_storer::MemoryStorer;
