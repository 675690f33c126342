//! Request-scoped caller identity.

use uuid::Uuid;

use super::profile::StaffRole;

/// Who is making a restaurant-management request.
///
/// Resolved exactly once per request (admin flag first, then profile
/// lookup) and threaded through; handlers never re-derive roles from the
/// database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// Platform administrator: unrestricted.
    Admin { user_id: Uuid },
    /// Restaurant staff: scoped to exactly one restaurant.
    RestaurantStaff {
        user_id: Uuid,
        restaurant_id: Uuid,
        role: StaffRole,
    },
}

impl Caller {
    pub fn user_id(&self) -> Uuid {
        match self {
            Caller::Admin { user_id } => *user_id,
            Caller::RestaurantStaff { user_id, .. } => *user_id,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Caller::Admin { .. })
    }

    /// The restaurant this caller is confined to, if any.
    pub fn restaurant_scope(&self) -> Option<Uuid> {
        match self {
            Caller::Admin { .. } => None,
            Caller::RestaurantStaff { restaurant_id, .. } => Some(*restaurant_id),
        }
    }

    /// Whether the caller may manage the given restaurant.
    pub fn can_manage(&self, restaurant_id: Uuid) -> bool {
        match self {
            Caller::Admin { .. } => true,
            Caller::RestaurantStaff {
                restaurant_id: own, ..
            } => *own == restaurant_id,
        }
    }
}
