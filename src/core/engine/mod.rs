pub mod aggregate;
pub mod build_id;
pub mod inspect;
pub mod policy;
pub mod traits;
