use crate::api::types::BodyId;
use crate::core::scene::NodeId;

/// How a body moves each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Stationary, pulses its scale.
    Star,
    /// Revolves by spinning its pivot about Y.
    Orbiting {
        pivot: NodeId,
        orbit_radius: f32,
        /// Tilt of the orbital plane about X, in radians.
        inclination: f32,
        /// Radians per second at zero progress.
        base_speed: f32,
    },
}

/// One of the three selectable bodies.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub id: BodyId,
    /// Hit-testable mesh node.
    pub mesh: NodeId,
    pub kind: BodyKind,
    /// Host-supplied scalar, conventionally in [0, 1]. Not clamped.
    pub progress: f32,
}

impl CelestialBody {
    pub fn star(id: BodyId, mesh: NodeId) -> Self {
        Self { id, mesh, kind: BodyKind::Star, progress: 0.0 }
    }

    pub fn orbiting(
        id: BodyId,
        mesh: NodeId,
        pivot: NodeId,
        orbit_radius: f32,
        inclination: f32,
        base_speed: f32,
    ) -> Self {
        Self {
            id,
            mesh,
            kind: BodyKind::Orbiting { pivot, orbit_radius, inclination, base_speed },
            progress: 0.0,
        }
    }

    pub fn pivot(&self) -> Option<NodeId> {
        match self.kind {
            BodyKind::Orbiting { pivot, .. } => Some(pivot),
            BodyKind::Star => None,
        }
    }

    pub fn orbit_radius(&self) -> Option<f32> {
        match self.kind {
            BodyKind::Orbiting { orbit_radius, .. } => Some(orbit_radius),
            BodyKind::Star => None,
        }
    }

    /// Uniform scale of the star at `elapsed` seconds.
    /// Progress scales the amplitude and never stops the pulse.
    pub fn pulse_scale(&self, elapsed: f32) -> f32 {
        ((elapsed * 2.0).sin() * 0.1 + 0.9) * (1.0 + self.progress * 0.5)
    }

    /// Angular speed of the pivot in radians per second. Zero for the star.
    pub fn angular_speed(&self) -> f32 {
        match self.kind {
            BodyKind::Orbiting { base_speed, .. } => base_speed * (0.8 + self.progress * 0.4),
            BodyKind::Star => 0.0,
        }
    }
}
