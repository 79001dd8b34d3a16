pub mod backoffice_queries;

pub use backoffice_queries::PgBackOffice;
