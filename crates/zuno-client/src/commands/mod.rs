pub mod audit;
pub mod cancel;
pub mod demo;
