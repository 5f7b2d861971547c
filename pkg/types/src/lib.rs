pub mod config;
pub mod externaldns;
pub mod meta;
pub mod rbac;
pub mod scheme;
pub mod service_account;
pub mod validate;
