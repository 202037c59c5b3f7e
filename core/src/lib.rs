mod command;

pub mod neighbor;
pub mod presence;
pub mod registry;
pub mod routes;
pub mod scheduler;
pub mod status;
pub mod sweep;
