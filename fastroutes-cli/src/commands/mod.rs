pub mod batch;
pub mod rank;
pub mod route;
