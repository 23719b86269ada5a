pub mod check;
pub mod grade;
pub mod profiles;
