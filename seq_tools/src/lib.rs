pub mod _utils;
pub mod rf_phase;
pub mod phase_table;
pub mod directive;
pub mod script_function;
pub mod pulse;
pub mod parameters;
pub mod console;
