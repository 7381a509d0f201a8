#[allow(unused_imports)]
pub mod prelude {
    pub use super::todo::Entity as Todo;
    pub use super::user::Entity as User;
}

pub mod todo;
pub mod user;
