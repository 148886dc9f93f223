pub mod history;
pub mod routes;
