//! Static vocabularies of recognized tag values
//!
//! Every table is a named, read-only list of strings. Rules and the feature
//! gate only ever ask one question of a table: does it contain this value.
//! All tables are reachable by name through [`by_name`] so tooling can list
//! them without knowing the individual statics.

/// A named set of accepted values for one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    name: &'static str,
    values: &'static [&'static str],
}

impl Vocabulary {
    /// Create a vocabulary table
    pub const fn new(name: &'static str, values: &'static [&'static str]) -> Self {
        Self { name, values }
    }

    /// Table name (kebab-case)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All accepted values, in declaration order
    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Road and path classes the checker accepts at all
pub static HIGHWAY_CLASSES: Vocabulary = Vocabulary::new(
    "highway-classes",
    &[
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "unclassified",
        "residential",
        "living_street",
        "service",
        "pedestrian",
        "track",
        "road",
        "busway",
        "footway",
        "cycleway",
        "bridleway",
        "path",
        "steps",
        "construction",
        "proposed",
    ],
);

pub static TRUTHY: Vocabulary = Vocabulary::new("truthy", &["yes", "true", "1"]);

pub static FALSY: Vocabulary = Vocabulary::new("falsy", &["no", "false", "0"]);

/// Classes that must carry a road number
pub static REF_REQUIRED: Vocabulary = Vocabulary::new(
    "ref-required",
    &[
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
    ],
);

/// Classes that may carry a road number
pub static REF_ALLOWED: Vocabulary = Vocabulary::new(
    "ref-allowed",
    &[
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
    ],
);

/// Classes dedicated to public traffic
pub static PUBLIC_HIGHWAYS: Vocabulary = Vocabulary::new(
    "public-highways",
    &[
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "unclassified",
        "residential",
        "living_street",
    ],
);

/// Classes that carry general motor traffic
pub static MOTOR_VEHICLE_HIGHWAYS: Vocabulary = Vocabulary::new(
    "motor-vehicle-highways",
    &[
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "unclassified",
        "residential",
        "living_street",
        "service",
        "road",
    ],
);

/// Classes where `maxspeed=none` is legal
pub static UNLIMITED_SPEED_HIGHWAYS: Vocabulary = Vocabulary::new(
    "unlimited-speed-highways",
    &["motorway", "motorway_link", "trunk", "trunk_link"],
);

/// Keys that grant or restrict access for a transport mode
pub static ACCESS_MODES: Vocabulary = Vocabulary::new(
    "access-modes",
    &[
        "access",
        "vehicle",
        "motor_vehicle",
        "motorcycle",
        "motorcar",
        "hgv",
        "psv",
        "bicycle",
        "foot",
        "goods",
        "mofa",
        "moped",
        "horse",
        "agricultural",
    ],
);

pub static ACCESS_VALUES: Vocabulary = Vocabulary::new(
    "access-values",
    &[
        "yes",
        "no",
        "private",
        "permissive",
        "destination",
        "delivery",
        "customers",
        "designated",
        "use_sidepath",
        "optional_sidepath",
        "dismount",
        "discouraged",
        "agricultural",
        "forestry",
        "permit",
        "official",
    ],
);

/// Access values that contradict a public road
pub static RESTRICTIVE_ACCESS: Vocabulary =
    Vocabulary::new("restrictive-access", &["permissive", "private", "customers"]);

pub static MAXSPEED_SYMBOLIC: Vocabulary = Vocabulary::new(
    "maxspeed-symbolic",
    &[
        "none",
        "walk",
        "signals",
        "variable",
        "DE:urban",
        "DE:rural",
        "DE:motorway",
        "DE:living_street",
        "DE:bicycle_road",
        "DE:zone:30",
        "DE:zone30",
        "DE:zone:20",
        "DE:zone20",
    ],
);

/// Symbolic values accepted for maxheight, maxwidth and maxweight
pub static DIMENSION_SYMBOLIC: Vocabulary =
    Vocabulary::new("dimension-symbolic", &["none", "default", "below_default"]);

pub static ONEWAY_VALUES: Vocabulary = Vocabulary::new(
    "oneway-values",
    &["yes", "no", "-1", "reversible", "alternating"],
);

pub static SIDEWALK_VALUES: Vocabulary = Vocabulary::new(
    "sidewalk-values",
    &["both", "left", "right", "no", "separate", "yes"],
);

pub static SIDEWALK_SIDE_VALUES: Vocabulary =
    Vocabulary::new("sidewalk-side-values", &["yes", "no", "separate"]);

/// Classes that never carry a sidewalk of their own
pub static SIDEWALK_EXCLUDED_CLASSES: Vocabulary = Vocabulary::new(
    "sidewalk-excluded-classes",
    &[
        "footway",
        "cycleway",
        "path",
        "steps",
        "track",
        "bridleway",
        "pedestrian",
    ],
);

/// Classes where foot and bicycle traffic can be segregated
pub static SEGREGATED_CLASSES: Vocabulary = Vocabulary::new(
    "segregated-classes",
    &["footway", "cycleway", "path", "bridleway"],
);

pub static SEGREGATED_VALUES: Vocabulary = Vocabulary::new("segregated-values", &["yes", "no"]);

pub static TURN_LANE_TOKENS: Vocabulary = Vocabulary::new(
    "turn-lane-tokens",
    &[
        "",
        "none",
        "left",
        "slight_left",
        "sharp_left",
        "through",
        "right",
        "slight_right",
        "sharp_right",
        "reverse",
        "merge_to_left",
        "merge_to_right",
    ],
);

pub static SERVICE_VALUES: Vocabulary = Vocabulary::new(
    "service-values",
    &[
        "driveway",
        "parking_aisle",
        "alley",
        "emergency_access",
        "drive-through",
        "slipway",
    ],
);

pub static TRACKTYPE_VALUES: Vocabulary = Vocabulary::new(
    "tracktype-values",
    &["grade1", "grade2", "grade3", "grade4", "grade5"],
);

pub static FOOTWAY_VALUES: Vocabulary = Vocabulary::new(
    "footway-values",
    &[
        "sidewalk",
        "crossing",
        "access_aisle",
        "link",
        "traffic_island",
        "alley",
    ],
);

/// Classes that may carry a `footway=*` refinement
pub static FOOTWAY_REFINABLE_CLASSES: Vocabulary =
    Vocabulary::new("footway-refinable-classes", &["footway", "path"]);

pub static CYCLEWAY_VALUES: Vocabulary = Vocabulary::new(
    "cycleway-values",
    &[
        "lane",
        "track",
        "shared_lane",
        "share_busway",
        "opposite",
        "opposite_lane",
        "opposite_track",
        "opposite_share_busway",
        "shoulder",
        "separate",
        "no",
        "crossing",
        "link",
    ],
);

/// `cycleway=*` values that refine a `highway=cycleway` itself
pub static CYCLEWAY_SELF_VALUES: Vocabulary =
    Vocabulary::new("cycleway-self-values", &["crossing", "link"]);

pub static OVERTAKING_VALUES: Vocabulary = Vocabulary::new(
    "overtaking-values",
    &["yes", "no", "caution", "both", "forward", "backward"],
);

pub static BRIDGE_VALUES: Vocabulary = Vocabulary::new(
    "bridge-values",
    &[
        "yes",
        "no",
        "viaduct",
        "aqueduct",
        "boardwalk",
        "cantilever",
        "covered",
        "movable",
        "trestle",
        "low_water_crossing",
    ],
);

pub static TUNNEL_VALUES: Vocabulary = Vocabulary::new(
    "tunnel-values",
    &[
        "yes",
        "no",
        "building_passage",
        "culvert",
        "avalanche_protector",
        "flooded",
    ],
);

pub static EARTHWORK_VALUES: Vocabulary = Vocabulary::new(
    "earthwork-values",
    &["yes", "no", "left", "right", "both"],
);

/// Keys that describe a point feature and do not belong on a way
pub static POINT_KEYS: Vocabulary = Vocabulary::new(
    "point-keys",
    &[
        "crossing",
        "crossing_ref",
        "traffic_calming",
        "barrier",
        "kerb",
        "entrance",
        "traffic_signals",
        "button_operated",
    ],
);

/// Keys collected by the access combination statistics, in output order
pub static COMBINATION_KEYS: Vocabulary = Vocabulary::new(
    "combination-keys",
    &[
        "highway",
        "access",
        "vehicle",
        "motor_vehicle",
        "motorcycle",
        "motorcar",
        "hgv",
        "psv",
        "bicycle",
        "foot",
        "agricultural",
        "goods",
        "mofa",
        "moped",
        "horse",
    ],
);

/// Every table, for lookup by name
pub static ALL: &[&Vocabulary] = &[
    &HIGHWAY_CLASSES,
    &TRUTHY,
    &FALSY,
    &REF_REQUIRED,
    &REF_ALLOWED,
    &PUBLIC_HIGHWAYS,
    &MOTOR_VEHICLE_HIGHWAYS,
    &UNLIMITED_SPEED_HIGHWAYS,
    &ACCESS_MODES,
    &ACCESS_VALUES,
    &RESTRICTIVE_ACCESS,
    &MAXSPEED_SYMBOLIC,
    &DIMENSION_SYMBOLIC,
    &ONEWAY_VALUES,
    &SIDEWALK_VALUES,
    &SIDEWALK_SIDE_VALUES,
    &SIDEWALK_EXCLUDED_CLASSES,
    &SEGREGATED_CLASSES,
    &SEGREGATED_VALUES,
    &TURN_LANE_TOKENS,
    &SERVICE_VALUES,
    &TRACKTYPE_VALUES,
    &FOOTWAY_VALUES,
    &FOOTWAY_REFINABLE_CLASSES,
    &CYCLEWAY_VALUES,
    &CYCLEWAY_SELF_VALUES,
    &OVERTAKING_VALUES,
    &BRIDGE_VALUES,
    &TUNNEL_VALUES,
    &EARTHWORK_VALUES,
    &POINT_KEYS,
    &COMBINATION_KEYS,
];

/// Look up a table by its name
pub fn by_name(name: &str) -> Option<&'static Vocabulary> {
    ALL.iter().copied().find(|v| v.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_contains_is_exact() {
        assert!(TRUTHY.contains("yes"));
        assert!(!TRUTHY.contains("Yes"));
        assert!(!TRUTHY.contains("yes "));
        assert!(FALSY.contains("0"));
    }

    #[test]
    fn test_truthy_and_falsy_disjoint() {
        for value in TRUTHY.values() {
            assert!(!FALSY.contains(value));
        }
    }

    #[test]
    fn test_public_highways_include_residential_and_living_street() {
        assert!(PUBLIC_HIGHWAYS.contains("residential"));
        assert!(PUBLIC_HIGHWAYS.contains("living_street"));
        assert!(!PUBLIC_HIGHWAYS.contains("service"));
    }

    #[test]
    fn test_ref_required_is_subset_of_allowed() {
        for class in REF_REQUIRED.values() {
            assert!(REF_ALLOWED.contains(class), "{class} missing from ref-allowed");
        }
    }

    #[test]
    fn test_names_unique_and_resolvable() {
        let mut seen = HashSet::new();
        for table in ALL {
            assert!(seen.insert(table.name()), "duplicate table {}", table.name());
            assert_eq!(by_name(table.name()), Some(*table));
        }
        assert!(by_name("no-such-table").is_none());
    }

    #[test]
    fn test_point_classes_not_accepted() {
        for class in ["bus_stop", "crossing", "traffic_signals", "street_lamp"] {
            assert!(!HIGHWAY_CLASSES.contains(class));
        }
    }
}
