/// terminal and file logging
pub mod logger;
