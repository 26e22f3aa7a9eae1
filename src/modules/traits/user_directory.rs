use crate::errors::CustomResult;
use crate::models::NewUser;
use crate::modules::models::user::User;

pub trait UserDirectory {
    fn find_user_by_username(&mut self, username: &str) -> CustomResult<Option<User>>;

    fn find_user_by_email(&mut self, email: &str) -> CustomResult<Option<User>>;

    fn insert_user(&mut self, new_user: NewUser) -> CustomResult<User>;
}
