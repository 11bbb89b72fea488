//! # hearth-db
//!
//! PostgreSQL implementations of every repository trait in `hearth-core`,
//! built on SQLx runtime queries.
//!
//! - Connection pool and migrations ([`pool`])
//! - Row models with SQLx `FromRow` derives ([`models`])
//! - Model → entity mappers
//! - Repository implementations ([`repositories`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hearth_core::traits::MessageRepository;
//! use hearth_core::MessageQuery;
//! use hearth_db::{create_pool_from_env, run_migrations, PgMessageRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool_from_env().await?;
//!     run_migrations(&pool).await?;
//!
//!     let messages = PgMessageRepository::new(pool);
//!     let page = messages.find_by_channel(channel_id, MessageQuery::latest(50)).await?;
//!     Ok(())
//! }
//! ```

mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DbError, PgPool};
pub use repositories::{
    PgAttachmentRepository, PgBanRepository, PgChannelOverrideRepository, PgChannelRepository,
    PgDmChannelRepository, PgGuildRepository, PgInviteRepository, PgMemberRepository,
    PgMessageRepository, PgReactionRepository, PgReadStateRepository, PgRoleRepository,
    PgUserRepository, PgVoiceStateRepository,
};
