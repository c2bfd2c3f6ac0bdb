pub mod airports;
pub mod config;
pub mod emissions;
pub mod pipeline;
pub mod travel;
pub mod util;
