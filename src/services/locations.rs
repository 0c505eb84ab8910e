// SPDX-License-Identifier: MIT

//! Named meeting locations and the time-of-day default rule.

/// A predefined place with a display name and map link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedLocation {
    pub key: &'static str,
    pub name: &'static str,
    pub map_url: &'static str,
}

/// Sentinel selection meaning "ask for free text in a modal".
pub const OTHER: &str = "other";

pub const LOCATIONS: [NamedLocation; 5] = [
    NamedLocation {
        key: "angry-catfish",
        name: "🚲 Angry Catfish",
        map_url: "https://maps.app.goo.gl/rrxhyZeaJR5UxfKp6",
    },
    NamedLocation {
        key: "northern-coffeeworks",
        name: "☕ Northern Coffeeworks",
        map_url: "https://maps.app.goo.gl/YjYhaHCDZkeggseT9",
    },
    NamedLocation {
        key: "venn-brewery",
        name: "🍺 Venn Brewery",
        map_url: "https://maps.app.goo.gl/L3qNdfBptyKAZuam8",
    },
    NamedLocation {
        key: "bull-horns",
        name: "🐂 Bull Horns",
        map_url: "https://maps.app.goo.gl/ZW5c6xZdnPK3URpR8",
    },
    NamedLocation {
        key: "sea-salt",
        name: "🐟 Sea Salt",
        map_url: "https://maps.app.goo.gl/M9fbExNSi3mWRJzR9",
    },
];

/// Look up a named location by its table key.
pub fn lookup(key: &str) -> Option<&'static NamedLocation> {
    LOCATIONS.iter().find(|location| location.key == key)
}

/// Render a location for display: table keys become a markdown map link,
/// free text passes through verbatim.
pub fn display(location: &str) -> String {
    match lookup(location) {
        Some(named) => format!("[{}]({})", named.name, named.map_url),
        None => location.to_string(),
    }
}

/// Default starting location when the caller supplies none:
/// the coffee spot before noon, the bike shop after.
pub fn default_starting_location(hour: u32) -> &'static str {
    if hour < 12 {
        "northern-coffeeworks"
    } else {
        "angry-catfish"
    }
}
