//! Text encodings.

mod blob;

pub use blob::{PasswordBlob, int_parse, parse_options, read_blob, write_blob};
