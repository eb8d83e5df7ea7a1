pub mod config;
pub mod history;
pub mod roots;
pub mod translate;
