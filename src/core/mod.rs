// Core modules: error model, date codec, field tables, typed accessors, options.
pub mod date;
pub mod error;
pub mod fields;
pub mod options;
pub mod schema;
