//! Role database model

use sqlx::FromRow;

/// Database model for roles table
#[derive(Debug, Clone, FromRow)]
pub struct RoleModel {
    pub id: i64,
    pub guild_id: i64,
    pub name: String,
    pub color: i32,
    pub permissions: i64,
    pub position: i32,
    pub is_default: bool,
}
