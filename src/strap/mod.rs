pub mod attribute;
pub mod link_event;
pub mod outcome;
pub mod profile;
