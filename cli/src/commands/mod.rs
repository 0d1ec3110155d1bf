pub mod profile;
pub mod trim;
