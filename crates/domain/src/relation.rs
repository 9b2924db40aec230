//! Outcome of the toggle relationships (like, favorite, follow, block, pin).

/// State of a relationship after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    #[must_use]
    pub fn is_on(self) -> bool {
        self == Self::On
    }

    #[must_use]
    pub fn from_bool(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// A block or follow edge removed as part of a block toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq + Copy> Edge<T> {
    #[must_use]
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    /// Both directions between `a` and `b`.
    #[must_use]
    pub fn between(a: T, b: T) -> [Self; 2] {
        [Self::new(a, b), Self::new(b, a)]
    }

    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}
