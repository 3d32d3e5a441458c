pub mod aggregate;
pub mod calendar;
pub mod consistency;
pub mod dates;
pub mod derive;
pub mod init;
pub mod mapping;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod schema;
pub mod validate;

pub use calendar::ShopCalendar;
pub use pipeline::{Ingestion, SchemaChoice, ingest};
pub use schema::SchemaVersion;
