pub mod backoffice;
pub mod db;
pub mod domain;

pub use backoffice::{BackOffice, ErpError};
