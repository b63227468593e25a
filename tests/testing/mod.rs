#![allow(dead_code)]

pub mod fixture;
pub mod sim_drive;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
