//! MoodLift API Server
//!
//! REST surface for the MoodLift backend.
//!
//! ## Endpoints
//!
//! ### Auth
//! - POST /api/auth/register - Create an account (signup bonus applied)
//! - POST /api/auth/login - Exchange credentials for a bearer token
//! - GET /api/auth/profile - Current user's profile
//! - PUT /api/auth/profile - Update profile fields
//! - POST /api/auth/change-password - Rotate the password
//!
//! ### Check-in
//! - GET /api/checkin/info - Read-only streak preview
//! - POST /api/checkin - Commit today's check-in
//!
//! ### Content
//! - GET /api/content/feed - Community feed
//! - GET /api/content/:category - Browse a category
//! - GET /api/content/:category/daily - Today's assigned set
//! - GET /api/content/mine - Caller's submissions
//! - POST /api/content/submit - Submit an item (+1 point)
//! - POST /api/content/:id/vote - Up/down vote (last value wins)
//! - POST /api/content/:id/report - Report (idempotent per user)
//! - POST /api/content/:id/unlock - Spend points to unlock
//!
//! ### Saved items
//! - GET /api/saved - List saved items
//! - POST /api/saved/:content_id - Save (duplicate is a no-op)
//! - DELETE /api/saved/:content_id - Unsave
//!
//! ### Users
//! - GET /api/users/points-history - Paged points ledger
//! - GET /api/users/stats - Aggregate statistics
//!
//! ### Admin
//! - DELETE /api/admin/content/:id - Soft-delete an item
//! - GET /api/admin/reported - Reported items with their reports
//! - GET /api/admin/stats - Platform counters

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::*;
pub use error::*;
pub use middleware::auth::{issue_token, AuthUser, JwtConfig};
pub use routes::create_router;
pub use server::*;
pub use state::*;
