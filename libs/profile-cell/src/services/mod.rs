pub mod profile;
pub mod specialty;
