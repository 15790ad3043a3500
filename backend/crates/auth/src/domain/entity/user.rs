//! User Entity
//!
//! Read-only view of the hosted user table: this service authenticates
//! accounts, it never creates or edits them.

use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: UserName,
    pub user_role: UserRole,
    pub password_hash: UserPassword,
}
