pub mod prelude;

pub mod admins;
pub mod applications;
pub mod blog_posts;
pub mod contact_info;
pub mod courses;
pub mod partners;
pub mod reviews;
pub mod teachers;
pub mod track_steps;
