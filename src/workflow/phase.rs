//! Workflow lifecycle phase

/// Where the workflow is in its placement lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not the active mode
    #[default]
    Inactive,
    /// Waiting for a location (search, geolocation or map click)
    CanPlaceMarker,
    /// Marker placed; waiting for the user to drag it
    CanMoveMarker,
    /// Marker confirmed; attributes editable and submit allowed
    CanAddFeature,
}

impl Phase {
    /// Any phase but [`Phase::Inactive`]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::CanPlaceMarker => write!(f, "can-place-marker"),
            Self::CanMoveMarker => write!(f, "can-move-marker"),
            Self::CanAddFeature => write!(f, "can-add-feature"),
        }
    }
}
