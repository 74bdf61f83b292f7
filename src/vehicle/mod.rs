pub mod ahrs;
pub mod arming;
pub mod attitude_control;
mod control_logic;
mod main_loop;
pub mod mixing;
pub mod modes;
pub mod pid;
pub mod radio;

pub use control_logic::calculate_output;
pub use main_loop::Stabilizer;
