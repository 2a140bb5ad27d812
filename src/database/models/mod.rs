pub mod doctor;
pub mod mapping;
pub mod patient;
pub mod user;

pub use doctor::Doctor;
pub use mapping::{AssignedDoctor, Mapping, MappingJoinRow, MappingWithRefs};
pub use patient::Patient;
pub use user::User;
