//! Services, errors and calendar helpers shared by the library and the shell.

pub mod errors;
pub mod format;
pub mod services;
pub mod time;
pub mod utils;
