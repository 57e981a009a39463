pub mod db_utils;
pub mod geo;
pub mod payroll;
pub mod username;
