//! Profile commands

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bookworm_core::config::expand_path;
use bookworm_core::transport::Upload;
use bookworm_core::{ProfileUpdate, Role, Route, Sex, UserProfile};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_credit, format_date, or_dash};
use super::Context;
use crate::output::{print_single, print_success, print_warning};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show your profile
    Show,

    /// Edit your profile; unspecified fields keep their current values
    Edit {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Email
        #[arg(short, long)]
        email: Option<String>,

        /// Sex (male or female)
        #[arg(long)]
        sex: Option<Sex>,

        /// Short biography
        #[arg(long)]
        bio: Option<String>,

        /// Postal address
        #[arg(long)]
        address: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<String>,

        /// Avatar image file
        #[arg(long)]
        image: Option<PathBuf>,

        /// Credit balance (administrators only)
        #[arg(long)]
        credit: Option<f64>,

        /// Role (administrators only)
        #[arg(long)]
        role: Option<Role>,
    },
}

/// Profile row for display
#[derive(Debug, Serialize, Tabled)]
pub struct ProfileRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Sex")]
    pub sex: String,
    #[tabled(rename = "Credit")]
    pub credit: String,
    #[tabled(rename = "Phone")]
    pub phone: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Born")]
    pub birth_date: String,
    #[tabled(rename = "Member Since")]
    pub member_since: String,
}

impl From<&UserProfile> for ProfileRow {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            name: or_dash(profile.name.as_deref()),
            email: or_dash(profile.email.as_deref()),
            role: profile.user_role.to_string(),
            sex: profile.user_sex.to_string(),
            credit: profile
                .credit
                .map(format_credit)
                .unwrap_or_else(|| "-".to_string()),
            phone: or_dash(profile.phone.as_deref()),
            address: or_dash(profile.address.as_deref()),
            birth_date: or_dash(profile.birth_date.as_deref()),
            member_since: format_date(&profile.created_at),
        }
    }
}

/// Profile edits from the command line
#[derive(Default)]
pub struct ProfileEdits {
    pub name: Option<String>,
    pub email: Option<String>,
    pub sex: Option<Sex>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub credit: Option<f64>,
    pub role: Option<Role>,
}

impl ProfileEdits {
    /// Overlay the edits on the stored profile
    pub fn apply(self, profile: &UserProfile) -> ProfileUpdate {
        let mut update = ProfileUpdate::from_profile(profile);
        if let Some(name) = self.name {
            update.name = name;
        }
        if let Some(email) = self.email {
            update.email = email;
        }
        if let Some(sex) = self.sex {
            update.sex = sex;
        }
        if self.bio.is_some() {
            update.bio = self.bio;
        }
        if self.address.is_some() {
            update.address = self.address;
        }
        if self.phone.is_some() {
            update.phone = self.phone;
        }
        if self.birth_date.is_some() {
            update.birth_date = self.birth_date;
        }
        update.credit = self.credit;
        update.role = self.role;
        update
    }
}

pub async fn execute(ctx: &Context, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Show => {
            ctx.gate(Route::Profile)?;
            let profile = ctx
                .client
                .my_profile()
                .await
                .context("Failed to load profile")?;
            print_single(&ProfileRow::from(&profile), ctx.format)
        }
        ProfileAction::Edit {
            name,
            email,
            sex,
            bio,
            address,
            phone,
            birth_date,
            image,
            credit,
            role,
        } => {
            let viewer = ctx.viewer(Route::EditProfile)?;
            if !viewer.is_admin() && (credit.is_some() || role.is_some()) {
                print_warning("Only administrators can change credit or role; ignoring", ctx.quiet);
            }

            let profile = ctx
                .client
                .my_profile()
                .await
                .context("Failed to load profile")?;
            let edits = ProfileEdits {
                name,
                email,
                sex,
                bio,
                address,
                phone,
                birth_date,
                credit,
                role,
            };
            let mut update = edits.apply(&profile);
            if let Some(path) = image {
                let path = expand_path(&path.to_string_lossy());
                update.image = Some(
                    Upload::from_path(&path)
                        .with_context(|| format!("Failed to read image {}", path.display()))?,
                );
            }

            let saved = ctx
                .client
                .update_profile(update)
                .await
                .context("Failed to update profile")?;
            if let Some(profile) = saved {
                print_single(&ProfileRow::from(&profile), ctx.format)?;
            }
            print_success("Profile updated", ctx.quiet);
            Ok(())
        }
    }
}
