mod blog;

pub use blog::{Blog, NewBlog};
