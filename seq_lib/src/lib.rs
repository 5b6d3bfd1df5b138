pub mod pulse_sequence;
pub mod phase_cycle;
pub mod console_params;
pub mod mqf;
