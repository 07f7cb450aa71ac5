pub mod token_service;
pub use token_service::{IssuedToken, TokenError, TokenService};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AdminIdentity, AuthError, AuthService, IdentitySource, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod course_service;
pub mod course_service_impl;
pub use course_service::{ContentError, CourseService, CourseUpdate};
pub use course_service_impl::SeaOrmCourseService;

pub mod notification;
pub use notification::{Notifier, TelegramNotifier};

pub mod application_service;
pub use application_service::{ApplicationService, ApplicationSubmission};
