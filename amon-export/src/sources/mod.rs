pub mod fixture_file;

pub use fixture_file::{Fixture, FixtureBackOffice, FixtureContract};
