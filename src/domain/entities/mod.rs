pub mod layout;
pub mod member;
pub mod sheet;
