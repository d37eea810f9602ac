//! Development data seeding

pub mod dev_seeder;

pub use dev_seeder::{dev_groups, dev_users, DevDataSeeder};
