//! The fixed roster of upstream endpoints to monitor.

/// Definition of an API endpoint to monitor.
#[derive(Debug, Clone, Copy)]
pub struct EndpointDefinition {
    pub path: &'static str,
    pub method: &'static str,
    pub requires_auth: bool,
    /// Some endpoints live on the separate game-server host.
    pub use_game_server: bool,
    pub params: &'static [(&'static str, &'static str)],
    pub description: &'static str,
}

impl EndpointDefinition {
    const fn get(path: &'static str, description: &'static str) -> Self {
        Self {
            path,
            method: "GET",
            requires_auth: true,
            use_game_server: false,
            params: &[],
            description,
        }
    }
}

/// Known upstream API endpoints, grouped by feature area.
pub const MONITORED_ENDPOINTS: &[EndpointDefinition] = &[
    // Profile endpoints
    EndpointDefinition::get("/v3/profiles", "Current user profile"),
    EndpointDefinition::get("/v3/profiles/stats", "User statistics"),
    EndpointDefinition::get("/v4/stats/me", "Extended user statistics"),
    EndpointDefinition::get("/v3/profiles/achievements", "User achievements"),
    EndpointDefinition::get("/v3/profiles/maps", "User's custom maps"),
    // Game endpoints
    EndpointDefinition::get("/v3/social/events/unfinishedgames", "Unfinished games"),
    // Social endpoints
    EndpointDefinition {
        params: &[("count", "10"), ("page", "0")],
        ..EndpointDefinition::get("/v4/feed/private", "Private activity feed")
    },
    EndpointDefinition::get("/v3/social/friends/summary", "Friends summary"),
    EndpointDefinition::get("/v3/social/badges/unclaimed", "Unclaimed badges"),
    EndpointDefinition::get(
        "/v3/social/maps/browse/personalized",
        "Personalized map recommendations",
    ),
    // Competitive endpoints
    EndpointDefinition::get("/v4/seasons/active/stats", "Active season statistics"),
    // Explorer endpoints
    EndpointDefinition::get("/v3/explorer", "Explorer mode progress"),
    // Objectives endpoints
    EndpointDefinition::get("/v4/objectives", "Current objectives"),
    EndpointDefinition::get("/v4/objectives/unclaimed", "Unclaimed objective rewards"),
    // Subscription endpoints
    EndpointDefinition::get("/v3/subscriptions", "Subscription information"),
    // Challenge endpoints
    EndpointDefinition::get("/v3/challenges/daily-challenges/today", "Today's daily challenge"),
    // Game server endpoints
    EndpointDefinition {
        use_game_server: true,
        ..EndpointDefinition::get("/tournaments", "Tournament information")
    },
];
