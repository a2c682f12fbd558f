//! # Resume Studio Core
//!
//! Canvas editing logic for an interactive resume builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├─────────────────────────────────────────────┤
//! │  Scene Graph     │  Command Log             │
//! │  - Elements      │  - Mutation events       │
//! │  - Grid / snap   │  - Undo cursor           │
//! │  - Snapshots     │                          │
//! ├─────────────────────────────────────────────┤
//! │  Layouts         │  Themes                  │
//! │  - Templates     │  - Presets               │
//! │  - Versions      │  - Custom styles         │
//! │  - KV store      │  - Dark mode             │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod feedback;
pub mod grid;
pub mod history;
pub mod layout;
pub mod persistence;
pub mod resume;
pub mod scene;
pub mod schema;
pub mod storage;
pub mod surface;
pub mod theme;

pub use editor::{Editor, EditorConfig};
pub use element::{Element, ElementId, ElementKind, FontWeight, TextStyle, Transform};
pub use error::{CanvasError, CanvasResult};
pub use event::{ListenerId, MutationKind, SceneEvent, SceneListener};
pub use feedback::{Feedback, LogFeedback};
pub use grid::{snap_to_grid, GridSettings, GRID_SIZE};
pub use history::{Command, CommandLog, CommandRecorder};
pub use layout::populate_scene;
pub use persistence::{
    LayoutError, LayoutId, LayoutPersistence, LayoutResult, Template, VersionSnapshot,
};
pub use resume::{
    Education, EducationField, Experience, ExperienceField, Personal, PersonalField, ResumeData,
};
pub use scene::Scene;
pub use schema::{ElementDocument, SceneDocument};
pub use storage::{FileStore, KvStore, MemoryStore, StoreError};
pub use surface::Surface;
pub use theme::{Theme, ThemeApplier};

/// Core library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
