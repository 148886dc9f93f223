//! Types shared between the admin backend and the admin frontend.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
