//! Entity models for Outlay
//!
//! Every persisted entity carries an ObjectId `_id` plus `created_at` /
//! `updated_at` timestamps that the service sets at creation and refreshes
//! on every update. Timestamps live in BSON datetimes so date predicates
//! can be evaluated inside the store.
//!
//! # Models
//!
//! - `user`: staff accounts that submit expenses
//! - `category`: expense categories
//! - `project`: projects, their members, and the derived details view
//! - `expense`: expense records with embedded category/user snapshots

pub mod category;
pub mod expense;
pub mod project;
pub mod user;

pub use category::Category;
pub use expense::{Expense, ExpenseStatus};
pub use project::{Project, ProjectDetails, ProjectMember};
pub use user::{Role, User};
