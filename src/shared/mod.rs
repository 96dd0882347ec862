pub mod logging;
pub mod validation;

pub use logging::{LogLevel, Logger};
pub use validation::{parse_input_value, InputError};
