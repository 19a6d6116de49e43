//! # Momentum Core Library
//!
//! Core business logic for the Momentum self-improvement tracker. All
//! operations are available through a standalone CLI binary; this crate
//! carries the state engine and leaves presentation to the front end.
//!
//! ## Architecture
//!
//! - **Tracker**: the single state root owning tasks, habits, XP and the
//!   finance ledger, applying every mutation and persisting a snapshot
//!   after each one
//! - **Recurrence**: pure calendar evaluation of daily/weekly/custom
//!   habit schedules
//! - **Gamification**: the XP accumulator and level curve
//! - **Storage**: SQLite-backed state documents and TOML configuration
//! - **Coach**: gateway to a generative-AI service for starter plans and
//!   chat replies, with deterministic offline fallbacks
//!
//! ## Key Components
//!
//! - [`Tracker`]: lifecycle manager for tasks, habits and XP
//! - [`StateDb`]: persistent state storage
//! - [`Config`]: application configuration management
//! - [`CoachGateway`]: trait for the generative-AI boundary

pub mod coach;
pub mod error;
pub mod finance;
pub mod gamification;
pub mod habit;
pub mod profile;
pub mod storage;
pub mod task;
pub mod tracker;

pub use coach::{ChatMessage, ChatRole, ChatSession, CoachGateway, GeminiCoach, OfflineCoach};
pub use error::{CoachError, ConfigError, CoreError, DatabaseError, Result};
pub use finance::{Ledger, Transaction, TransactionKind};
pub use gamification::{Gamification, XP_PER_LEVEL};
pub use habit::{Frequency, Habit};
pub use profile::{FocusArea, UserProfile};
pub use storage::{Config, StateDb};
pub use task::{Task, TaskCategory};
pub use tracker::{AppState, PlanSource, StateStore, ToggleOutcome, Tracker};
