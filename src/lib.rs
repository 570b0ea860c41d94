pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs_ops;
pub mod gtdbtk;
pub mod layout;
pub mod output;
pub mod router;
pub mod table;
pub mod taxonomy;
