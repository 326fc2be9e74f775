//! User management list.

use crate::model::User;

use super::markup::escape;
use super::{Patch, ViewContext};

pub const USER_LIST: &str = "user-list-container";

/// The built-in account that can never be deleted from the dashboard.
const PROTECTED_USER: &str = "admin";

pub fn render_users(users: Option<&[User]>, ctx: &ViewContext) -> Vec<Patch> {
    let Some(users) = users else {
        return Vec::new();
    };
    let html: String = users
        .iter()
        .map(|u| user_row(u, ctx.role.is_admin()))
        .collect();
    vec![Patch::html(USER_LIST, html)]
}

fn user_row(user: &User, admin: bool) -> String {
    let username = escape(&user.username);
    let delete = if admin && user.username != PROTECTED_USER {
        format!(
            r#"<button class="btn btn-icon btn-user-delete" data-username="{username}"><i class="fa-solid fa-user-minus"></i></button>"#
        )
    } else {
        String::new()
    };
    format!(
        r#"<div class="user-row"><div><span class="user-name">{username}</span><span class="badge">{role}</span></div>{delete}</div>"#,
        role = escape(&user.role),
    )
}
