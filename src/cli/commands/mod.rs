mod admin;

pub use admin::{cmd_create_admin, cmd_hash_password, cmd_set_admin_active};
