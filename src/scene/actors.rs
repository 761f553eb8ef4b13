//! Actor registry
//!
//! The host mirrors the positions of the actors the engine cares about:
//! the protected actor the brush must keep clear of, and the targets
//! combat overlap queries run against.

use crate::core::types::Vec3;

/// Stable handle for a registered actor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(u32);

impl ActorId {
    /// Raw id value, for logs
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// A positioned actor with a collision radius
#[derive(Clone, Copy, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub position: Vec3,
    pub radius: f32,
}

/// Registry of live actors, updated by the host each tick
pub struct SceneActors {
    actors: Vec<Actor>,
    protected: Option<ActorId>,
    next_id: u32,
}

impl SceneActors {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            protected: None,
            next_id: 0,
        }
    }

    /// Register an actor
    pub fn add(&mut self, position: Vec3, radius: f32) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.push(Actor { id, position, radius });
        id
    }

    /// Remove an actor; clears the protected mark if it was this one
    pub fn remove(&mut self, id: ActorId) {
        self.actors.retain(|a| a.id != id);
        if self.protected == Some(id) {
            self.protected = None;
        }
    }

    /// Move an actor
    pub fn set_position(&mut self, id: ActorId, position: Vec3) {
        if let Some(actor) = self.actors.iter_mut().find(|a| a.id == id) {
            actor.position = position;
        }
    }

    /// Mark the actor the brush must keep its distance from
    pub fn set_protected(&mut self, id: ActorId) {
        self.protected = Some(id);
    }

    /// Position of the protected actor, if one is set and alive
    pub fn protected_position(&self) -> Option<Vec3> {
        let id = self.protected?;
        self.actors.iter().find(|a| a.id == id).map(|a| a.position)
    }

    /// All actors whose spheres overlap a query sphere
    pub fn within(&self, center: Vec3, range: f32) -> impl Iterator<Item = &Actor> {
        self.actors
            .iter()
            .filter(move |a| a.position.distance(center) <= range + a.radius)
    }

    /// Look up an actor by id
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Number of registered actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True when no actors are registered
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl Default for SceneActors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_respects_actor_radius() {
        let mut actors = SceneActors::new();
        let near = actors.add(Vec3::new(2.0, 0.0, 0.0), 0.5);
        let far = actors.add(Vec3::new(10.0, 0.0, 0.0), 0.5);

        let hits: Vec<_> = actors.within(Vec3::ZERO, 2.0).map(|a| a.id).collect();
        assert!(hits.contains(&near)); // 2.0 <= 2.0 + 0.5
        assert!(!hits.contains(&far));
    }

    #[test]
    fn test_protected_lifecycle() {
        let mut actors = SceneActors::new();
        assert!(actors.protected_position().is_none());

        let player = actors.add(Vec3::new(1.0, 0.0, 1.0), 0.4);
        actors.set_protected(player);
        assert_eq!(actors.protected_position(), Some(Vec3::new(1.0, 0.0, 1.0)));

        actors.set_position(player, Vec3::ZERO);
        assert_eq!(actors.protected_position(), Some(Vec3::ZERO));

        actors.remove(player);
        assert!(actors.protected_position().is_none());
    }
}
