//! Domain entities - the core business objects.

mod category;
mod page;
mod post;
mod user;

pub use category::Category;
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, SortDirection, SortField};
pub use post::Blog;
pub use user::CustomerUser;
