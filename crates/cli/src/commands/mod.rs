pub mod describe;
pub mod repair;
pub mod verify;
