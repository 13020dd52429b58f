//! Authentication commands
//!
//! Login, registration, logout, whoami and password changes. Success and
//! failure toasts come from the session manager's notifier.

use anyhow::Result;
use bookworm_core::session::token::token_expiry;
use bookworm_core::{ChangePasswordForm, LoginRequest, RegisterForm, Route, Session};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_opt_date, or_dash};
use super::Context;
use crate::output::{print_info, print_single};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (or set BOOKWORM_PASSWORD env var)
        #[arg(short, long, env = "BOOKWORM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in with it
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password: 8+ characters with upper, lower, digit and one of @$!%*?&
        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm_password: String,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Change your password
    ChangePassword {
        /// Current password
        #[arg(long)]
        old_password: String,

        /// New password
        #[arg(long)]
        new_password: String,

        /// Repeat the new password
        #[arg(long)]
        confirm_password: String,
    },
}

/// Session row for display
#[derive(Debug, Serialize, Tabled)]
pub struct SessionRow {
    #[tabled(rename = "User ID")]
    pub user_id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Token Expires")]
    pub expires: String,
}

impl From<&Session> for SessionRow {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            name: or_dash(session.user_name.as_deref()),
            role: session.user_role.to_string(),
            expires: format_opt_date(token_expiry(&session.access_token).as_ref()),
        }
    }
}

pub async fn execute(ctx: &Context, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login { email, password } => {
            let session = ctx
                .client
                .session()
                .login(LoginRequest { email, password })
                .await?;
            log::debug!("[auth] Signed in as user {}", session.user_id);
            Ok(())
        }
        AuthAction::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                name,
                email,
                password,
                confirm_password,
            };
            ctx.client.session().register(form).await?;
            Ok(())
        }
        AuthAction::Logout => {
            if !ctx.client.session().is_authenticated() {
                print_info("Not logged in.", ctx.quiet);
                return Ok(());
            }
            ctx.client.session().logout();
            Ok(())
        }
        AuthAction::Whoami => match ctx.client.session().current() {
            Some(session) => print_single(&SessionRow::from(&session), ctx.format),
            None => {
                print_info("Not logged in.", ctx.quiet);
                Ok(())
            }
        },
        AuthAction::ChangePassword {
            old_password,
            new_password,
            confirm_password,
        } => {
            ctx.gate(Route::ChangePassword)?;
            let form = ChangePasswordForm {
                old_password,
                new_password,
                confirm_password,
            };
            ctx.client.session().change_password(form).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookworm_core::Role;

    #[test]
    fn test_session_row_without_decodable_token() {
        let session = Session {
            user_id: 4,
            user_name: None,
            user_role: Role::User,
            image_url: None,
            access_token: "not-a-jwt".to_string(),
        };
        let row = SessionRow::from(&session);
        assert_eq!(row.name, "-");
        assert_eq!(row.role, "User");
        assert_eq!(row.expires, "-");
    }
}
