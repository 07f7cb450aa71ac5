pub use super::admins::Entity as Admins;
pub use super::applications::Entity as Applications;
pub use super::blog_posts::Entity as BlogPosts;
pub use super::contact_info::Entity as ContactInfo;
pub use super::courses::Entity as Courses;
pub use super::partners::Entity as Partners;
pub use super::reviews::Entity as Reviews;
pub use super::teachers::Entity as Teachers;
pub use super::track_steps::Entity as TrackSteps;
