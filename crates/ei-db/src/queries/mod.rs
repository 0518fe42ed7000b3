//! Database query modules.

pub mod employee_images;
