//! Scene mutation events and listener registration.

use serde::{Deserialize, Serialize};

use crate::{ElementId, Scene};

/// Kind of scene mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    /// An object was added.
    Add,
    /// An object was removed.
    Remove,
    /// An object was modified by the user.
    Modify,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Modify => "modify",
        })
    }
}

/// A mutation notification dispatched synchronously after the scene changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "id", rename_all = "lowercase")]
pub enum SceneEvent {
    /// Object added.
    Added(ElementId),
    /// Object removed.
    Removed(ElementId),
    /// Object modified.
    Modified(ElementId),
}

impl SceneEvent {
    /// The mutation kind of this event.
    #[must_use]
    pub const fn kind(&self) -> MutationKind {
        match self {
            Self::Added(_) => MutationKind::Add,
            Self::Removed(_) => MutationKind::Remove,
            Self::Modified(_) => MutationKind::Modify,
        }
    }

    /// The element the event refers to.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        match self {
            Self::Added(id) | Self::Removed(id) | Self::Modified(id) => *id,
        }
    }
}

/// Observer of scene mutations.
///
/// Listeners see the scene after the mutation was applied and cannot mutate it.
pub trait SceneListener: Send {
    /// Called once per mutation.
    fn on_scene_event(&mut self, event: SceneEvent, scene: &Scene);
}

impl<F> SceneListener for F
where
    F: FnMut(SceneEvent, &Scene) + Send,
{
    fn on_scene_event(&mut self, event: SceneEvent, scene: &Scene) {
        self(event, scene);
    }
}

/// Handle returned by [`Scene::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
