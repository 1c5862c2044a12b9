use glam::Vec3;

/// Identity of one of the three selectable bodies.
/// The tag strings are what the host receives in selection callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyId {
    /// The system's star.
    Star,
    /// Inner orbiting body (Secondary-A).
    Octavia,
    /// Outer orbiting body (Secondary-B).
    Zythera,
}

impl BodyId {
    pub const ALL: [BodyId; 3] = [BodyId::Star, BodyId::Octavia, BodyId::Zythera];

    /// Stable identity tag.
    pub fn tag(self) -> &'static str {
        match self {
            BodyId::Star => "star",
            BodyId::Octavia => "octavia",
            BodyId::Zythera => "zythera",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        BodyId::ALL.into_iter().find(|b| b.tag() == tag)
    }

    /// Dense index, usable for fixed-size per-body arrays.
    pub fn index(self) -> usize {
        match self {
            BodyId::Star => 0,
            BodyId::Octavia => 1,
            BodyId::Zythera => 2,
        }
    }

    pub fn is_orbiting(self) -> bool {
        !matches!(self, BodyId::Star)
    }
}

/// Payload handed to the selection callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionInfo {
    /// World-space point the camera is zooming to.
    pub position: Vec3,
    /// Logical radius (orbit radius for orbiting bodies).
    pub radius: Option<f32>,
}

/// Externally supplied selection callback.
pub type SelectCallback = Box<dyn FnMut(BodyId, &SelectionInfo)>;

/// Measured host dimensions, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Container size; drives aspect ratio and the drawing surface.
    pub width: f32,
    pub height: f32,
    /// Screen (window) width; drives device-tier classification.
    pub screen_width: f32,
    pub screen_height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// Viewport where the container fills the screen.
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            screen_width: width,
            screen_height: height,
            device_pixel_ratio,
        }
    }

    pub fn with_screen(mut self, screen_width: f32, screen_height: f32) -> Self {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
        self
    }

    /// Both container dimensions are positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Container aspect ratio, `None` for a zero-size container.
    pub fn aspect(&self) -> Option<f32> {
        self.has_area().then(|| self.width / self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for body in BodyId::ALL {
            assert_eq!(BodyId::from_tag(body.tag()), Some(body));
        }
        assert_eq!(BodyId::from_tag("pluto"), None);
    }

    #[test]
    fn indices_are_dense() {
        let mut seen = [false; 3];
        for body in BodyId::ALL {
            seen[body.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn zero_sized_viewport_has_no_aspect() {
        assert_eq!(Viewport::new(0.0, 600.0, 1.0).aspect(), None);
        assert_eq!(Viewport::new(800.0, 0.0, 1.0).aspect(), None);
        assert_eq!(Viewport::new(800.0, 400.0, 1.0).aspect(), Some(2.0));
    }
}
