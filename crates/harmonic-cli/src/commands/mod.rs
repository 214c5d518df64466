pub mod config;
pub mod design;
pub mod info;
pub mod max;
pub mod run;
